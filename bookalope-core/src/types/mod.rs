//! Value types shared by the Bookalope resources

mod field;
mod format;
mod lifecycle;
mod style;

pub use field::Field;
pub use format::{Format, FormatList};
pub use lifecycle::{ConversionStatus, CreditType, DocumentType, Step};
pub use style::{Style, DEFAULT_STYLE};

pub(crate) use style::StylePayload;
