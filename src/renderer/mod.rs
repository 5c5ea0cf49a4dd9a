pub mod colours;
pub mod drawing;
pub mod widgets;

pub use colours::{Colours, Severity};
pub use widgets::Style;
