//! Static field descriptors for record types.
//!
//! A record type lists its fields once, in column order, and every mapper
//! operation reads that same table. Use the [`record!`](crate::record!) macro
//! rather than implementing [`Record`] by hand.

use crate::error::{Error, Result};
use crate::value::{ConversionError, Value};

/// Descriptor for one field of a record type `R`.
pub struct Field<R> {
    /// Column name the field maps to. Matching is exact and case-sensitive.
    pub name: &'static str,
    /// Declared Rust type, kept for diagnostics.
    pub ty: &'static str,
    pub primary_key: bool,
    pub get: fn(&R) -> Value,
    pub set: fn(&mut R, &Value) -> Result<(), ConversionError>,
}

impl<R> std::fmt::Debug for Field<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .field("primary_key", &self.primary_key)
            .finish()
    }
}

/// A plain data record whose fields correspond to the columns of one table.
pub trait Record: Default + Sized + 'static {
    /// Record type name, used in operator messages.
    const NAME: &'static str;

    /// Ordered field descriptors.
    const FIELDS: &'static [Field<Self>];

    /// Returns the single field marked as primary key.
    fn key_field() -> Result<&'static Field<Self>> {
        let mut keys = Self::FIELDS.iter().filter(|field| field.primary_key);
        match (keys.next(), keys.count()) {
            (Some(field), 0) => Ok(field),
            (first, rest) => Err(Error::MissingPrimaryKey {
                record: Self::NAME,
                found: usize::from(first.is_some()) + rest,
            }),
        }
    }

    /// Current values of every field, in declaration order.
    fn values(&self) -> Vec<(&'static str, Value)> {
        Self::FIELDS
            .iter()
            .map(|field| (field.name, (field.get)(self)))
            .collect()
    }
}

/// Implements [`Record`] for an existing struct.
///
/// Each entry names the struct field, its type and the column it maps to.
/// Exactly one entry carries `#[key]` when the type is used with
/// `update` or `delete`.
///
/// ```
/// use sqlite_record_mapper::record;
///
/// #[derive(Debug, Default)]
/// pub struct Student {
///     pub student_id: i64,
///     pub name: String,
///     pub gpa: Option<f64>,
/// }
///
/// record! {
///     Student {
///         #[key] student_id: i64 => "StudentID",
///         name: String => "Name",
///         gpa: Option<f64> => "GPA",
///     }
/// }
/// ```
#[macro_export]
macro_rules! record {
    (@key key) => { true };
    (@key) => { false };
    (
        $record:ident {
            $( $(#[$key:ident])? $field:ident : $ty:ty => $column:literal ),* $(,)?
        }
    ) => {
        impl $crate::Record for $record {
            const NAME: &'static str = stringify!($record);

            const FIELDS: &'static [$crate::Field<Self>] = &[
                $(
                    $crate::Field {
                        name: $column,
                        ty: stringify!($ty),
                        primary_key: $crate::record!(@key $($key)?),
                        get: |record: &$record| $crate::Value::from(record.$field.clone()),
                        set: |record: &mut $record, value: &$crate::Value| {
                            record.$field = <$ty as $crate::FromValue>::from_value(value)?;
                            Ok(())
                        },
                    },
                )*
            ];
        }
    };
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Student {
        pub student_id: i64,
        pub name: String,
        pub gpa: Option<f64>,
    }

    crate::record! {
        Student {
            #[key] student_id: i64 => "StudentID",
            name: String => "Name",
            gpa: Option<f64> => "GPA",
        }
    }

    #[derive(Debug, Default)]
    struct Note {
        body: String,
    }

    crate::record! {
        Note {
            body: String => "Body",
        }
    }

    #[test]
    fn fields_keep_declaration_order() {
        let names: Vec<_> = Student::FIELDS.iter().map(|field| field.name).collect();
        assert_eq!(names, ["StudentID", "Name", "GPA"]);
        assert!(Student::FIELDS[2].ty.contains("f64"));
        assert_eq!(Student::NAME, "Student");
    }

    #[test]
    fn key_field_is_the_marked_one() {
        assert_eq!(Student::key_field().unwrap().name, "StudentID");

        let err = Note::key_field().unwrap_err();
        assert!(matches!(
            err,
            Error::MissingPrimaryKey {
                record: "Note",
                found: 0
            }
        ));
    }

    #[test]
    fn values_read_fields_through_descriptors() {
        let student = Student {
            student_id: 1,
            name: "Ana".into(),
            gpa: None,
        };
        assert_eq!(
            student.values(),
            vec![
                ("StudentID", Value::Integer(1)),
                ("Name", Value::Text("Ana".into())),
                ("GPA", Value::Null),
            ]
        );
    }

    #[test]
    fn setters_convert_values() {
        let mut student = Student::default();
        (Student::FIELDS[2].set)(&mut student, &Value::Integer(4)).unwrap();
        assert_eq!(student.gpa, Some(4.0));

        let err = (Student::FIELDS[0].set)(&mut student, &Value::Text("x".into())).unwrap_err();
        assert_eq!(err.expected, "i64");
        assert_eq!(student.student_id, 0);
    }
}
