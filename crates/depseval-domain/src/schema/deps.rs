use super::shape::{Field, Shape};
use std::sync::LazyLock;

static DEPS_SCHEMA: LazyLock<Shape> = LazyLock::new(build);

/// Shape of a DEPS manifest scope. Every top-level key is optional.
pub fn deps_schema() -> &'static Shape {
    &DEPS_SCHEMA
}

fn strings() -> Shape {
    Shape::list_of(Shape::Str)
}

fn hooks() -> Shape {
    Shape::list_of(Shape::Record(vec![
        Field::required("action", strings()),
        Field::optional("name", Shape::Str),
        Field::optional("pattern", Shape::Str),
    ]))
}

fn build() -> Shape {
    Shape::Record(vec![
        Field::optional("allowed_hosts", strings()),
        Field::optional(
            "deps",
            Shape::map_of(Shape::OneOf(vec![
                Shape::Str,
                Shape::Record(vec![Field::required("url", Shape::Str)]),
            ])),
        ),
        Field::optional(
            "deps_os",
            Shape::map_of(Shape::map_of(Shape::OneOf(vec![Shape::Str, Shape::Null]))),
        ),
        Field::optional("hooks", hooks()),
        Field::optional("hooks_os", Shape::map_of(hooks())),
        Field::optional("include_rules", strings()),
        Field::optional("pre_deps_hooks", hooks()),
        Field::optional(
            "recursedeps",
            Shape::list_of(Shape::OneOf(vec![
                Shape::Str,
                Shape::pair(Shape::Str, Shape::Str),
            ])),
        ),
        Field::optional("skip_child_includes", strings()),
        Field::optional("specific_include_rules", Shape::map_of(strings())),
        Field::optional("target_os", strings()),
        Field::optional("use_relative_paths", Shape::Bool),
        Field::optional(
            "vars",
            Shape::map_of(Shape::OneOf(vec![Shape::Str, Shape::Bool])),
        ),
    ])
}
