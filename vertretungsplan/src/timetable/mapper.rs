//! Column-to-attribute mapping for timetable tables.

use std::fmt;
use std::str::FromStr;

/// Attribute name of the column that may hold several classes.
pub const CLASS_ATTRIBUTE: &str = "class";

/// Columns the default DSB layout uses, in table order.
pub const DEFAULT_COLUMNS: [&str; 7] = [
    "class",
    "lesson",
    "new_subject",
    "new_room",
    "subject",
    "room",
    "text",
];

/// Entry fields that are not table columns and so cannot be mapped.
const RESERVED: [&str; 4] = ["date", "day", "updated", "source"];

/// Error returned when a table mapper is malformed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MapperError {
    #[error("table mapper column {index} has an empty name")]
    EmptyName { index: usize },

    #[error("table mapper names column {name:?} twice")]
    Duplicate { name: String },

    #[error("table mapper column {name:?} collides with a built-in entry field")]
    Reserved { name: String },
}

/// Ordered mapping from table column index to entry attribute name.
///
/// The position of the `class` column is computed once at construction.
///
/// # Examples
///
/// ```
/// use vertretungsplan::timetable::TableMapper;
///
/// let mapper = TableMapper::new(["lesson", "class", "text"]).unwrap();
/// assert_eq!(mapper.class_index(), Some(1));
/// assert_eq!(mapper.attribute(0), "lesson");
/// assert_eq!(mapper.attribute(5), "col5");
///
/// assert!(TableMapper::new(["class", "class"]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableMapper {
    columns: Vec<String>,
    class_index: Option<usize>,
}

impl TableMapper {
    /// Build a mapper from attribute names in column order.
    pub fn new<I, S>(columns: I) -> Result<Self, MapperError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();

        for (index, name) in columns.iter().enumerate() {
            if name.is_empty() {
                return Err(MapperError::EmptyName { index });
            }
            if RESERVED.contains(&name.as_str()) {
                return Err(MapperError::Reserved { name: name.clone() });
            }
            if columns[..index].contains(name) {
                return Err(MapperError::Duplicate { name: name.clone() });
            }
        }

        let class_index = columns.iter().position(|c| c == CLASS_ATTRIBUTE);

        Ok(Self {
            columns,
            class_index,
        })
    }

    /// Index of the `class` column, if the mapper has one.
    pub fn class_index(&self) -> Option<usize> {
        self.class_index
    }

    /// Attribute name for a column; `col<N>` past the end of the mapper.
    pub fn attribute(&self, index: usize) -> String {
        self.columns
            .get(index)
            .cloned()
            .unwrap_or_else(|| format!("col{index}"))
    }

    /// The configured attribute names.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }
}

impl Default for TableMapper {
    fn default() -> Self {
        Self {
            columns: DEFAULT_COLUMNS.iter().map(|c| c.to_string()).collect(),
            class_index: Some(0),
        }
    }
}

/// Parses a comma-separated list such as `"class, lesson, text"`.
impl FromStr for TableMapper {
    type Err = MapperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.split(',').map(str::trim))
    }
}

impl fmt::Display for TableMapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.columns.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout() {
        let mapper = TableMapper::default();
        assert_eq!(mapper.class_index(), Some(0));
        assert_eq!(mapper.columns().len(), 7);
        assert_eq!(mapper.attribute(2), "new_subject");
        assert_eq!(mapper.attribute(6), "text");
        assert_eq!(mapper.attribute(7), "col7");
        assert_eq!(mapper, TableMapper::new(DEFAULT_COLUMNS).unwrap());
    }

    #[test]
    fn class_index_found_anywhere() {
        let mapper = TableMapper::new(["lesson", "subject", "class"]).unwrap();
        assert_eq!(mapper.class_index(), Some(2));
    }

    #[test]
    fn no_class_column() {
        let mapper = TableMapper::new(["lesson", "text"]).unwrap();
        assert_eq!(mapper.class_index(), None);
    }

    #[test]
    fn empty_mapper_names_every_column() {
        let mapper = TableMapper::new(Vec::<String>::new()).unwrap();
        assert_eq!(mapper.attribute(0), "col0");
        assert_eq!(mapper.class_index(), None);
    }

    #[test]
    fn rejects_bad_names() {
        assert_eq!(
            TableMapper::new(["class", ""]),
            Err(MapperError::EmptyName { index: 1 })
        );
        assert_eq!(
            TableMapper::new(["text", "text"]),
            Err(MapperError::Duplicate {
                name: "text".into()
            })
        );
        assert_eq!(
            TableMapper::new(["date"]),
            Err(MapperError::Reserved {
                name: "date".into()
            })
        );
    }

    #[test]
    fn parse_from_str() {
        let mapper: TableMapper = "class, lesson ,text".parse().unwrap();
        assert_eq!(mapper.columns(), ["class", "lesson", "text"]);
        assert_eq!(mapper.to_string(), "class,lesson,text");

        assert!("class,,text".parse::<TableMapper>().is_err());
    }
}
