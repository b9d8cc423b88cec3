use std::{
    fmt,
    sync::{
        LazyLock,
        atomic::{AtomicU64, Ordering},
    },
};

use regex::Regex;

static NEXT_ENTRY_KEY: AtomicU64 = AtomicU64::new(1);

/// Synthetic identity handed to an array entry when it is created. It never
/// changes while the entry lives, whatever its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryKey(u64);

impl EntryKey {
    pub fn fresh() -> Self {
        EntryKey(NEXT_ENTRY_KEY.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    Field(String),
    Entry(EntryKey),
}

/// Location of a value inside a form record, with array entries addressed by
/// [`EntryKey`] instead of position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath(Vec<Segment>);

impl FieldPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn field(name: impl Into<String>) -> Self {
        FieldPath(vec![Segment::Field(name.into())])
    }

    pub fn join(&self, name: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(Segment::Field(name.into()));
        FieldPath(segments)
    }

    pub fn entry(&self, key: EntryKey) -> Self {
        let mut segments = self.0.clone();
        segments.push(Segment::Entry(key));
        FieldPath(segments)
    }

    /// Field-only path built from raw segments, cut at the first positional
    /// segment (errors inside plain id lists land on the list itself).
    pub fn plain<S: AsRef<str>>(segments: &[S]) -> Self {
        let fields = segments
            .iter()
            .map(AsRef::as_ref)
            .take_while(|segment| segment.parse::<usize>().is_err())
            .map(|segment| Segment::Field(segment.to_string()))
            .collect();
        FieldPath(fields)
    }

    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn starts_with(&self, prefix: &FieldPath) -> bool {
        self.0.len() >= prefix.0.len() && self.0[..prefix.0.len()] == prefix.0[..]
    }

    pub fn entry_keys(&self) -> impl Iterator<Item = EntryKey> + '_ {
        self.0.iter().filter_map(|segment| match segment {
            Segment::Entry(key) => Some(*key),
            Segment::Field(_) => None,
        })
    }

    pub fn first_field(&self) -> Option<&str> {
        match self.0.first() {
            Some(Segment::Field(name)) => Some(name),
            _ => None,
        }
    }

    pub fn last_field(&self) -> Option<&str> {
        self.0.iter().rev().find_map(|segment| match segment {
            Segment::Field(name) => Some(name.as_str()),
            Segment::Entry(_) => None,
        })
    }

    /// Shape of the path with entry identities erased, e.g.
    /// `strategyLevel[].duration`. Message tables are keyed by it.
    pub fn pattern(&self) -> String {
        let mut out = String::new();
        for segment in &self.0 {
            match segment {
                Segment::Field(name) => {
                    if !out.is_empty() {
                        out.push('.');
                    }
                    out.push_str(name);
                }
                Segment::Entry(_) => out.push_str("[]"),
            }
        }
        out
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("<root>");
        }
        let mut first = true;
        for segment in &self.0 {
            match segment {
                Segment::Field(name) => {
                    if !first {
                        f.write_str(".")?;
                    }
                    f.write_str(name)?;
                }
                Segment::Entry(key) => write!(f, "[{key}]")?,
            }
            first = false;
        }
        Ok(())
    }
}

/// Splits a JSON pointer (`/strategyLevel/0/duration`) into unescaped segments.
pub fn pointer_segments(pointer: &str) -> Vec<String> {
    pointer
        .split('/')
        .skip(1)
        .map(|segment| segment.replace("~1", "/").replace("~0", "~"))
        .collect()
}

static METADATA_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^.\[\]]+").expect("static metadata segment regex"));

/// Splits a backend metadata key. Both `strategyLevel.0.duration` and
/// `strategyLevel[0].duration` are accepted; pointers are passed through.
pub fn metadata_segments(key: &str) -> Vec<String> {
    if key.starts_with('/') {
        return pointer_segments(key);
    }
    METADATA_SEGMENT
        .find_iter(key)
        .map(|found| found.as_str().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_erases_entry_identity() {
        let key = EntryKey::fresh();
        let path = FieldPath::field("strategyLevel").entry(key).join("duration");
        assert_eq!(path.pattern(), "strategyLevel[].duration");
        assert_eq!(path.to_string(), format!("strategyLevel[{key}].duration"));
    }

    #[test]
    fn plain_paths_stop_at_positional_segments() {
        let path = FieldPath::plain(&["alarmGroupIds", "3"]);
        assert_eq!(path, FieldPath::field("alarmGroupIds"));
    }

    #[test]
    fn metadata_keys_accept_dotted_and_bracketed_forms() {
        assert_eq!(
            metadata_segments("strategyLevel[1].duration"),
            vec!["strategyLevel", "1", "duration"]
        );
        assert_eq!(
            metadata_segments("strategyLevel.1.duration"),
            vec!["strategyLevel", "1", "duration"]
        );
        assert_eq!(metadata_segments("/name"), vec!["name"]);
    }

    #[test]
    fn starts_with_matches_whole_segments() {
        let key = EntryKey::fresh();
        let entry = FieldPath::field("levels").entry(key);
        let leaf = entry.join("count");
        assert!(leaf.starts_with(&entry));
        assert!(!entry.starts_with(&leaf));
        assert!(!FieldPath::field("levelsX").starts_with(&FieldPath::field("levels")));
    }
}
