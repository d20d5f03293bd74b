//! Middle-end module - Whole-unit passes over the reference graph

pub mod reachability;
