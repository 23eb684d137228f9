pub mod lenders;
pub mod market;
pub mod markets;
pub mod quote;
