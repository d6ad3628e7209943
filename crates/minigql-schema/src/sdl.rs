//! SDL rendering of a built schema.

use std::fmt::Write;

use crate::field::{FieldDef, ObjectType};
use crate::registry::Schema;

impl<C> Schema<C> {
    /// Render the schema as GraphQL SDL.
    ///
    /// The `schema { .. }` block comes first, then the roots, then the other
    /// object types sorted by name.
    pub fn sdl(&self) -> String {
        let mut out = String::new();
        out.push_str("schema {\n");
        let _ = writeln!(out, "  query: {}", self.query_root().name);
        if let Some(mutation) = self.mutation_root() {
            let _ = writeln!(out, "  mutation: {}", mutation.name);
        }
        out.push_str("}\n");

        let roots = std::iter::once(self.query_root()).chain(self.mutation_root());
        for ty in roots.chain(self.objects()) {
            out.push('\n');
            write_type(&mut out, ty);
        }
        out
    }
}

fn write_type<C>(out: &mut String, ty: &ObjectType<C>) {
    if let Some(desc) = &ty.description {
        let _ = writeln!(out, "\"{}\"", escape(desc));
    }
    let _ = writeln!(out, "type {} {{", ty.name);
    for field in &ty.fields {
        write_field(out, field);
    }
    out.push_str("}\n");
}

fn write_field<C>(out: &mut String, field: &FieldDef<C>) {
    if let Some(desc) = &field.description {
        let _ = writeln!(out, "  \"{}\"", escape(desc));
    }
    out.push_str("  ");
    out.push_str(&field.name);
    if !field.args.is_empty() {
        let args: Vec<String> = field
            .args
            .iter()
            .map(|a| {
                let mut arg = match &a.description {
                    Some(desc) => format!("\"{}\" {}: {}", escape(desc), a.name, a.ty),
                    None => format!("{}: {}", a.name, a.ty),
                };
                if let Some(default) = &a.default {
                    let _ = write!(arg, " = {default}");
                }
                arg
            })
            .collect();
        let _ = write!(out, "({})", args.join(", "));
    }
    let _ = writeln!(out, ": {}", field.ty);
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use crate::field::{ArgumentDef, FieldDef, ObjectType};
    use crate::registry::{RootKind, SchemaBuilder};
    use crate::types::TypeRef;
    use serde_json::json;

    #[test]
    fn renders_roots_then_types() {
        let mut b = SchemaBuilder::<()>::new();
        b.define_type(
            ObjectType::new("Comment").field(FieldDef::new("body", TypeRef::named("String"))),
        )
        .unwrap();
        b.define_root(
            RootKind::Query,
            ObjectType::new("RootQuery").field(
                FieldDef::new("comments", TypeRef::list(TypeRef::named("Comment")))
                    .description("All \"comments\"")
                    .argument(
                        ArgumentDef::new("limit", TypeRef::named("Int")).default_value(json!(5)),
                    )
                    .resolve(|_| Ok(json!([]))),
            ),
        )
        .unwrap();
        let sdl = b.build().unwrap().sdl();
        let expected = "schema {\n  query: RootQuery\n}\n\n\
            type RootQuery {\n  \"All \\\"comments\\\"\"\n  \
            comments(limit: Int = 5): [Comment]\n}\n\n\
            type Comment {\n  body: String\n}\n";
        assert_eq!(sdl, expected);
    }

    #[test]
    fn argument_descriptions_precede_the_argument() {
        let mut b = SchemaBuilder::<()>::new();
        b.define_root(
            RootKind::Query,
            ObjectType::new("Query").field(
                FieldDef::new("tutorial", TypeRef::named("Int"))
                    .argument(
                        ArgumentDef::new("id", TypeRef::named("Int"))
                            .description("Tutorial \"id\"")
                            .default_value(json!(1)),
                    )
                    .resolve(|_| Ok(json!(1))),
            ),
        )
        .unwrap();
        let sdl = b.build().unwrap().sdl();
        assert!(sdl.contains("  tutorial(\"Tutorial \\\"id\\\"\" id: Int = 1): Int\n"));
    }
}
