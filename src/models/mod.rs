/*
Copyright (c) 2020 Todd Stellanova
LICENSE: BSD3 (see LICENSE file)
*/

//! Supported sensor parts

mod gc2053;
mod jx_f37;
mod ov2735b;
mod sc2335;

pub use gc2053::Gc2053;
pub use jx_f37::JxF37;
pub use ov2735b::Ov2735b;
pub use sc2335::Sc2335;
