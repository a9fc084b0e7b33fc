/// Declares a mapped model.
///
/// ```
/// use relq_core::model;
/// use relq_core::kind::{Integer, Text};
///
/// model! {
///     /// A registered user
///     pub struct User in "users" {
///         id: Integer<i64> [primary_key, auto_increment],
///         name: Text [not_null, max_length(64)],
///         age: Integer<i32>,
///     }
/// }
///
/// let user = User { name: "Ann".into(), age: 31.into(), ..Default::default() };
/// assert_eq!(user.name.to_string(), "Ann");
/// assert!(user.id.is_null());
/// ```
///
/// Expands to:
///
/// * the struct, with one public [`Attribute`](crate::Attribute) per column,
/// * one zero-sized column marker per field, named `<Model><Field>` in
///   camel case (`UserName`), returned by an associated function named
///   after the field (`User::name()`),
/// * the [`Model`](crate::Model), [`Scope`](crate::Scope) and
///   [`FromRow`](crate::FromRow) impls, including a static
///   [`Schema`](crate::Schema) and by-name text access
///   ([`Model::get`](crate::Model::get), [`Model::set_str`](crate::Model::set_str)).
///
/// Constraints in brackets are [`Constraints`](crate::Constraints) builder
/// calls: `primary_key`, `auto_increment`, `not_null`, `unique`,
/// `max_length(n)`.
#[macro_export]
macro_rules! model {
    (
        $(#[$meta:meta])*
        $vis:vis struct $model:ident in $table:literal {
            $(
                $(#[$field_meta:meta])*
                $field:ident : $kind:ty $([ $($constraint:ident $(($arg:expr))?),* $(,)? ])?
            ),* $(,)?
        }
    ) => {
        $crate::paste::paste! {
            $(#[$meta])*
            #[derive(Debug, Clone, PartialEq, Default)]
            $vis struct $model {
                $(
                    $(#[$field_meta])*
                    pub $field: $crate::Attribute<[<$model $field:camel>]>,
                )*
            }

            $(
                #[doc = concat!("Column marker for `", $table, ".", stringify!($field), "`.")]
                #[derive(Debug, Clone, Copy, Default)]
                $vis struct [<$model $field:camel>];

                impl $crate::Column for [<$model $field:camel>] {
                    type Model = $model;
                    type Kind = $kind;

                    const NAME: &'static str = stringify!($field);
                    const CONSTRAINTS: $crate::Constraints =
                        $crate::Constraints::new() $($( .$constraint($($arg)?) )*)?;
                }

                $crate::__impl_columns!([<$model $field:camel>], $model);
            )*

            impl $model {
                $(
                    #[doc = concat!("Column `", stringify!($field), "`.")]
                    #[inline]
                    #[allow(dead_code)]
                    $vis const fn $field() -> [<$model $field:camel>] {
                        [<$model $field:camel>]
                    }
                )*
            }

            impl $crate::Scope for $model {
                type Root = $model;
            }

            impl $crate::InScope<$model, $crate::scope::Here> for $model {}

            impl $crate::Model for $model {
                const TABLE_NAME: &'static str = $table;
                const SCHEMA: &'static $crate::Schema = &$crate::Schema::new(
                    $table,
                    &[
                        $(
                            $crate::ColumnDef::new(
                                stringify!($field),
                                <$kind as $crate::Kind>::TYPE,
                                <[<$model $field:camel>] as $crate::Column>::CONSTRAINTS,
                            ),
                        )*
                    ],
                );

                fn to_values(&self) -> ::std::vec::Vec<$crate::SQLValue> {
                    ::std::vec![$(self.$field.to_sql_value(),)*]
                }

                fn get(&self, column: &str) -> ::std::option::Option<::std::string::String> {
                    $(
                        if column == stringify!($field) {
                            return ::std::option::Option::Some(
                                ::std::string::ToString::to_string(&self.$field),
                            );
                        }
                    )*
                    ::std::option::Option::None
                }

                fn set_str(&mut self, column: &str, text: &str) -> $crate::Result<()> {
                    $(
                        if column == stringify!($field) {
                            self.$field = text.parse()?;
                            return ::std::result::Result::Ok(());
                        }
                    )*
                    ::std::result::Result::Err($crate::Error::Usage(::std::format!(
                        "`{}` has no column `{}`",
                        $table,
                        column
                    )))
                }
            }

            impl $crate::FromRow for $model {
                fn from_row(row: &mut $crate::RowReader) -> $crate::Result<Self> {
                    ::std::result::Result::Ok(Self {
                        $(
                            $field: <$crate::Attribute<[<$model $field:camel>]> as $crate::FromRow>::from_row(row)?,
                        )*
                    })
                }
            }
        }
    };
}
