mod spot;

pub use spot::ParkingSpot;
