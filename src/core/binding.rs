use std::{fmt, sync::Arc};

use log::debug;

use crate::{
    core::{
        cache::BindingCache,
        column::ColumnIndex,
        convert::{CellValue, Converter, MemberType, Value},
        row::Row,
    },
    error::RowError,
};

type Assign<T> = Arc<dyn Fn(&mut T, Value) -> bool + Send + Sync>;

/// A settable member of a bindable type.
///
/// A member pairs the name it is matched on (ignoring case) with its declared
/// [`MemberType`] and a setter receiving the converted value.
pub struct Member<T> {
    name: String,
    member_type: MemberType,
    nullable: bool,
    assign: Assign<T>,
}

impl<T> Member<T> {
    /// Declares a member whose type is given by the setter's value type.
    ///
    /// ```
    /// use row_binder_rs::core::{binding::Member, convert::MemberType};
    ///
    /// #[derive(Default)]
    /// struct Person {
    ///     age: Option<u8>,
    /// }
    ///
    /// let member = Member::new("Age", |person: &mut Person, age| person.age = age);
    ///
    /// assert_eq!(member.member_type(), MemberType::UInt8);
    /// assert!(member.is_nullable());
    /// ```
    pub fn new<V, F>(name: impl Into<String>, setter: F) -> Self
    where
        V: CellValue + 'static,
        F: Fn(&mut T, V) + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            member_type: V::member_type(),
            nullable: V::nullable(),
            assign: Arc::new(move |target, value| match V::from_value(value) {
                Some(value) => {
                    setter(target, value);
                    true
                }
                None => false,
            }),
        }
    }

    /// Declares a member with an explicit type and a setter working on raw
    /// [`Value`]s. The setter returns `false` when it cannot take the value.
    pub fn untyped<F>(
        name: impl Into<String>,
        member_type: MemberType,
        nullable: bool,
        assign: F,
    ) -> Self
    where
        F: Fn(&mut T, Value) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            member_type,
            nullable,
            assign: Arc::new(assign),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn member_type(&self) -> MemberType {
        self.member_type
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }
}

impl<T> fmt::Debug for Member<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Member")
            .field("name", &self.name)
            .field("member_type", &self.member_type)
            .field("nullable", &self.nullable)
            .finish()
    }
}

/// A type whose rows can be bound by column name.
///
/// Members missing from a row's columns keep the value they have in
/// `T::default()`.
///
/// ```
/// use row_binder_rs::core::binding::{Bindable, Member};
///
/// #[derive(Debug, Default)]
/// struct Person {
///     id: i64,
///     name: String,
///     age: i32,
/// }
///
/// impl Bindable for Person {
///     fn members() -> Vec<Member<Self>> {
///         vec![
///             Member::new("Id", |p: &mut Person, v| p.id = v),
///             Member::new("Name", |p: &mut Person, v| p.name = v),
///             Member::new("Age", |p: &mut Person, v| p.age = v),
///         ]
///     }
/// }
/// ```
pub trait Bindable: Default + Sized + 'static {
    fn members() -> Vec<Member<Self>>;
}

/// The writable members of a target type.
pub struct TypeDescription<T> {
    type_name: &'static str,
    members: Vec<Member<T>>,
}

impl<T> TypeDescription<T> {
    /// Creates an empty description; members are added with
    /// [`TypeDescription::member`].
    pub fn new() -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            members: Vec::new(),
        }
    }

    pub fn member(mut self, member: Member<T>) -> Self {
        self.members.push(member);
        self
    }

    pub fn members(&self) -> &[Member<T>] {
        &self.members
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl<T: Bindable> TypeDescription<T> {
    /// The description declared by `T` itself.
    pub fn of() -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            members: T::members(),
        }
    }
}

impl<T> Default for TypeDescription<T> {
    fn default() -> Self {
        Self::new()
    }
}

struct BindingStep<T> {
    column: usize,
    column_name: String,
    member: String,
    converter: Converter,
    assign: Assign<T>,
}

/// A compiled, positional program turning rows of one column layout into `T`.
///
/// A binding only reads cells by the positions captured when it was compiled;
/// it never looks a column name up again. It is immutable and can be shared
/// between threads.
pub struct Binding<T> {
    type_name: &'static str,
    steps: Vec<BindingStep<T>>,
}

impl<T: Default> Binding<T> {
    /// Builds a `T` from `row`.
    ///
    /// Fails with [`RowError::ConversionError`] on the first cell that cannot
    /// be converted; nothing is skipped or substituted.
    pub fn apply(&self, row: &Row) -> Result<T, RowError> {
        let mut target = T::default();

        for step in &self.steps {
            let raw = row.value(step.column)?;

            let value = step
                .converter
                .convert(raw)
                .map_err(|error| step.conversion_error(raw, error.to_string()))?;

            if !(step.assign)(&mut target, value) {
                return Err(step.conversion_error(
                    raw,
                    format!("value does not fit {}", step.converter.target()),
                ));
            }
        }

        Ok(target)
    }
}

impl<T> Binding<T> {
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// The bound `(member, column position)` pairs, in application order.
    pub fn bound_members(&self) -> impl Iterator<Item = (&str, usize)> {
        self.steps.iter().map(|step| (step.member.as_str(), step.column))
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl<T> fmt::Debug for Binding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("type_name", &self.type_name)
            .field("steps", &self.bound_members().collect::<Vec<_>>())
            .finish()
    }
}

impl<T> BindingStep<T> {
    fn conversion_error(&self, raw: &str, reason: String) -> RowError {
        RowError::ConversionError {
            member: self.member.clone(),
            column: self.column_name.clone(),
            raw: raw.to_owned(),
            reason,
        }
    }
}

/// Compiles type descriptions against column layouts.
pub struct TypeBinder;

impl TypeBinder {
    /// Resolves every member of `description` against `columns` and selects
    /// its converter.
    ///
    /// Members without a matching column are left out of the binding. A
    /// matched member whose type has no converter fails the whole compilation
    /// with [`RowError::UnsupportedMemberType`].
    pub fn compile<T>(
        description: &TypeDescription<T>,
        columns: &ColumnIndex,
    ) -> Result<Binding<T>, RowError> {
        let mut steps = Vec::with_capacity(description.members.len());

        for member in &description.members {
            let Some(column) = columns.index_of(&member.name) else {
                debug!(
                    "Member {} of {} has no matching column, keeping its default",
                    member.name, description.type_name
                );
                continue;
            };

            let column_name = columns.name(column).unwrap_or_default().to_owned();

            let converter = Converter::for_member(member.member_type, member.nullable)
                .ok_or_else(|| RowError::UnsupportedMemberType {
                    member: member.name.clone(),
                    column: column_name.clone(),
                    member_type: member.member_type.to_string(),
                })?;

            steps.push(BindingStep {
                column,
                column_name,
                member: member.name.clone(),
                converter,
                assign: Arc::clone(&member.assign),
            });
        }

        debug!(
            "Compiled binding for {}: {} of {} members bound over {} columns",
            description.type_name,
            steps.len(),
            description.members.len(),
            columns.len()
        );

        Ok(Binding {
            type_name: description.type_name,
            steps,
        })
    }

    /// Returns a function building `T` from rows laid out as `columns`.
    ///
    /// The binding comes from the process-wide [`BindingCache`], so asking
    /// twice for the same type and column names compiles only once.
    pub fn build_accessor<T: Bindable>(
        columns: &ColumnIndex,
    ) -> Result<impl Fn(&Row) -> Result<T, RowError> + Send + Sync + use<T>, RowError> {
        let binding = BindingCache::global().get_or_compile::<T>(columns)?;
        Ok(move |row: &Row| binding.apply(row))
    }
}
