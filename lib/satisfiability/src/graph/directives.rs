use graphql_parser::schema::{Directive, Value};

pub(crate) trait CompositeSchemaDirective: Sized {
    const NAME: &'static str;

    fn is(directive: &Directive<'_, String>) -> bool {
        directive.name == Self::NAME
    }

    fn parse(directive: &Directive<'_, String>) -> Self;

    fn find(directives: &[Directive<'_, String>]) -> Option<Self> {
        directives.iter().find(|d| Self::is(d)).map(Self::parse)
    }

    fn find_all(directives: &[Directive<'_, String>]) -> Vec<Self> {
        directives
            .iter()
            .filter(|d| Self::is(d))
            .map(Self::parse)
            .collect()
    }

    fn present(directives: &[Directive<'_, String>]) -> bool {
        directives.iter().any(|d| Self::is(d))
    }
}

fn string_argument(directive: &Directive<'_, String>, name: &str) -> Option<String> {
    directive
        .arguments
        .iter()
        .find(|(arg_name, _)| arg_name == name)
        .and_then(|(_, value)| match value {
            Value::String(value) => Some(value.clone()),
            _ => None,
        })
}

macro_rules! marker_directive {
    ($name:ident, $directive:literal) => {
        pub(crate) struct $name;

        impl CompositeSchemaDirective for $name {
            const NAME: &'static str = $directive;

            fn parse(_directive: &Directive<'_, String>) -> Self {
                Self
            }
        }
    };
}

marker_directive!(LookupDirective, "lookup");
marker_directive!(InternalDirective, "internal");
marker_directive!(InaccessibleDirective, "inaccessible");
marker_directive!(ExternalDirective, "external");
marker_directive!(ShareableDirective, "shareable");

/// `@key(fields: "...")`
pub(crate) struct KeyDirective {
    pub fields: Option<String>,
}

impl CompositeSchemaDirective for KeyDirective {
    const NAME: &'static str = "key";

    fn parse(directive: &Directive<'_, String>) -> Self {
        Self {
            fields: string_argument(directive, "fields"),
        }
    }
}

/// `@is(field: "...")` on a lookup argument.
pub(crate) struct IsDirective {
    pub field: Option<String>,
}

impl CompositeSchemaDirective for IsDirective {
    const NAME: &'static str = "is";

    fn parse(directive: &Directive<'_, String>) -> Self {
        Self {
            field: string_argument(directive, "field"),
        }
    }
}

/// `@require(field: "...")` on a field argument.
pub(crate) struct RequireDirective {
    pub field: Option<String>,
}

impl CompositeSchemaDirective for RequireDirective {
    const NAME: &'static str = "require";

    fn parse(directive: &Directive<'_, String>) -> Self {
        Self {
            field: string_argument(directive, "field"),
        }
    }
}
