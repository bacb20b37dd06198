pub mod coelution;
pub mod monomer;
pub mod quantify;
pub mod significance;
