#![allow(dead_code)]

pub use dagmanifest_test_utils::{builders, init_tracing};
