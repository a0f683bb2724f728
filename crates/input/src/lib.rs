//! Desktop input mapped to viewer actions, plus orbit controls that turn
//! those actions into camera motion.
//!
//! # Invariants
//! - Windowing code produces [`Action`]s; it never moves the camera itself.
//! - [`OrbitControls`] only writes the camera inside
//!   [`OrbitControls::update`].

pub mod action;
pub mod orbit;

pub use action::Action;
pub use orbit::OrbitControls;

pub fn crate_info() -> &'static str {
    "vista-input v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("input"));
    }
}
