#![doc = include_str!("../README.md")]

pub mod nom_helpers;
