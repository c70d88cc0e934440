pub mod context;
pub mod integrated;
pub mod modulation_selection;
pub mod rmlsa_type;
pub mod routing;
pub mod spectrum_assignment;
