//! UI module - reusable components and chart rendering

pub mod chart;
pub mod components;
