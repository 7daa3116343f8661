/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! Geometry primitives shared by the configuration and the reciprocal-space engine

pub mod matrix;
pub mod vector;

pub use matrix::Matrix3;
pub use vector::Vector3D;
