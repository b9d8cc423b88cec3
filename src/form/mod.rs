mod array;
mod error;
mod key_value;
mod multi_select;
mod path;
mod record;
mod state;
mod validation;

pub use array::{Entry, FieldArray, summarize_value};
pub use error::{FieldCoercionError, FieldErrors};
pub use key_value::{KeyValueList, KeyValuePair};
pub use multi_select::{OptionGroup, OptionGroups, OptionSet, TriState};
pub use path::{EntryKey, FieldPath, Segment, metadata_segments, pointer_segments};
pub use record::{
    FieldMessage, FieldSlot, FieldValue, FormRecord, Keyword, OptionSource, SlotKind, lookup_message,
    resolve_entry, unknown_path,
};
pub use state::FormController;
pub use validation::{FormValidator, ValidationOutcome, ValidatorBuildError};
