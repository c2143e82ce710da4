pub mod code_generator;

pub use code_generator::{
    generate_coupon_code, generate_coupon_code_thread_rng, is_valid_coupon_code,
};
