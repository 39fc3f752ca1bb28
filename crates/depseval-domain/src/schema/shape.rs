use std::fmt;

/// Declarative description of an allowed value shape.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Shape {
    Str,
    Bool,
    Null,
    /// List with every element matching the inner shape.
    ListOf(Box<Shape>),
    /// Two-element list or tuple.
    Pair(Box<Shape>, Box<Shape>),
    /// Dict with string keys and uniform values.
    MapOf(Box<Shape>),
    /// Dict with a fixed set of string keys.
    Record(Vec<Field>),
    /// First matching alternative wins.
    OneOf(Vec<Shape>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub shape: Shape,
    pub required: bool,
}

impl Field {
    pub fn required(name: &'static str, shape: Shape) -> Self {
        Self {
            name,
            shape,
            required: true,
        }
    }

    pub fn optional(name: &'static str, shape: Shape) -> Self {
        Self {
            name,
            shape,
            required: false,
        }
    }
}

impl Shape {
    pub fn list_of(inner: Shape) -> Self {
        Shape::ListOf(Box::new(inner))
    }

    pub fn map_of(inner: Shape) -> Self {
        Shape::MapOf(Box::new(inner))
    }

    pub fn pair(first: Shape, second: Shape) -> Self {
        Shape::Pair(Box::new(first), Box::new(second))
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Str => f.write_str("str"),
            Shape::Bool => f.write_str("bool"),
            Shape::Null => f.write_str("None"),
            Shape::ListOf(inner) => write!(f, "[{inner}]"),
            Shape::Pair(a, b) => write!(f, "({a}, {b})"),
            Shape::MapOf(inner) => write!(f, "{{str: {inner}}}"),
            Shape::Record(fields) => {
                f.write_str("{")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    let marker = if field.required { "" } else { "?" };
                    write!(f, "{}{marker}: {}", field.name, field.shape)?;
                }
                f.write_str("}")
            }
            Shape::OneOf(alternatives) => {
                for (i, alt) in alternatives.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" or ")?;
                    }
                    write!(f, "{alt}")?;
                }
                Ok(())
            }
        }
    }
}
