pub mod dates;
pub mod forecast;
pub mod obligations;
pub mod register;
