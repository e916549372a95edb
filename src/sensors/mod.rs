mod service;

pub use service::SensorService;
