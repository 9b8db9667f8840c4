// handlers/mod.rs - Route handlers, split by whether the auth gate runs
//
// public:    no authentication (service info, health)
// protected: bearer token required; handlers receive the caller as Extension<AuthUser>
pub mod protected;
pub mod public;
