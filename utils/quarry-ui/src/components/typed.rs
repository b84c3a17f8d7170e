use console::Style;
use serde::{Serialize, Serializer};

use crate::Message;

/// A message prefixed with its kind, for example `warn: ...` or `error: ...`.
///
/// In JSON mode, this serializes as `{"type": ..., "message": ...}`.
#[derive(Serialize)]
pub struct TypedMessage<'a> {
    r#type: &'a str,
    message: &'a str,

    #[serde(skip)]
    type_style: &'a str,
}

impl<'a> TypedMessage<'a> {
    /// Create a message whose type prefix is rendered with the given [`Style`] (dotted string).
    pub fn styled(ty: &'a str, type_style: &'a str, message: &'a str) -> Self {
        Self {
            r#type: ty,
            message,
            type_style,
        }
    }
}

impl Message for TypedMessage<'_> {
    fn text(self) -> String {
        format!(
            "{}: {}",
            Style::from_dotted_str(self.type_style).apply_to(self.r#type),
            self.message
        )
    }

    fn structured<S: Serializer>(self, ser: S) -> Result<S::Ok, S::Error> {
        self.serialize(ser)
    }
}
