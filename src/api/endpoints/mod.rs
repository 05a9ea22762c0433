pub mod auth;
pub mod dashboard;
pub mod medicines;
pub mod patients;
pub mod pharmacies;
pub mod prescriptions;
