pub mod dimension;
pub mod numbering;
pub mod parsers;
pub mod position;
pub mod stylesheet;
pub mod text;

pub use dimension::{Dimension, Margins, Orientation, PageSize};
pub use numbering::NumberStyle;
pub use parsers::StyleParseError;
pub use position::{LayoutMode, OverflowAction, OverflowSplit, PositionMode};
pub use stylesheet::ElementStyle;
pub use text::{HorizontalAlign, VerticalAlign};
