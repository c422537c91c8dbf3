pub mod user;

pub use user::{
    LoginRequest, LoginResponse, NewUser, ProfileChanges, RegisterRequest, UpdateProfileRequest,
    User,
};
