mod decision;
mod device;
mod engine;
mod event;
mod reading;
mod record;
mod window;

pub use decision::target_brightness;
pub use decision::Anomaly;
pub use decision::Mode;
pub use engine::Engine;
pub use event::Event;
pub use reading::Reading;
pub use record::ProcessedResult;
pub use window::SampleWindow;
