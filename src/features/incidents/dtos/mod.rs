mod incident_dto;

pub use incident_dto::{CategoryResponseDto, CreateIncidentDto, IncidentResponseDto};
