/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! Shared utilities

pub mod data1d;

pub use data1d::Data1D;
