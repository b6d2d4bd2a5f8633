//! @ai:module:intent Turn parsed struct and interface declarations into generator entities
//! @ai:module:layer application
//! @ai:module:public_api extract_file, extract_source, extract_unit
//! @ai:module:depends_on parser, descriptor, annotation, naming, entity, error
//! @ai:module:stateless true

use crate::annotation::Annotation;
use crate::descriptor::{resolve, TypeDescriptor, TypeExpr, INVALID_TYPE};
use crate::entity::{MemberEntity, ParameterDescriptor, TypeEntity, TypeKind};
use crate::error::{Error, Result};
use crate::parser::{
    parse_file, parse_source, DeclShape, FieldDecl, InterfaceElem, MethodDecl, ParamGroup,
    SourceUnit,
};
use std::path::Path;

/// @ai:intent Extract every struct and interface entity from a Go file
/// @ai:pre path exists and is a Go source file
/// @ai:post entities appear in declaration order
/// @ai:effects fs:read
pub fn extract_file(path: &Path) -> Result<Vec<TypeEntity>> {
    let unit = parse_file(path)?;
    extract_unit(&unit)
}

/// @ai:intent Extract entities from Go source text
/// @ai:effects pure
pub fn extract_source(path: &Path, content: &str) -> Result<Vec<TypeEntity>> {
    let unit = parse_source(path, content)?;
    extract_unit(&unit)
}

/// @ai:intent Convert a parsed unit's declarations into entities
/// @ai:post Err(MalformedTag) if any struct tag has broken quoting
/// @ai:effects logging
pub fn extract_unit(unit: &SourceUnit) -> Result<Vec<TypeEntity>> {
    let mut entities = Vec::new();

    for decl in &unit.declarations {
        let (kind, fields) = match &decl.shape {
            DeclShape::Struct(fields) => (TypeKind::Record, record_members(unit, fields)?),
            DeclShape::Interface(elems) => (TypeKind::Contract, contract_members(unit, elems)),
            DeclShape::Other(shape) => {
                tracing::debug!(
                    "{}:{}: skipping {} ({})",
                    unit.path.display(),
                    decl.line,
                    decl.name,
                    shape
                );
                continue;
            }
        };

        let mut entity = TypeEntity::new(&decl.name, kind);
        entity.docs = decl.docs.clone();
        entity.comments = decl.comments.clone();
        entity.fields = fields;
        entities.push(entity);
    }

    tracing::debug!(
        "{}: extracted {} entities",
        unit.path.display(),
        entities.len()
    );

    Ok(entities)
}

fn record_members(unit: &SourceUnit, fields: &[FieldDecl]) -> Result<Vec<MemberEntity>> {
    let mut members = Vec::new();

    for field in fields {
        let annotation = match &field.tag {
            Some(literal) => {
                Annotation::parse(literal).map_err(|e| locate(e, unit, field.line))?
            }
            None => Annotation::default(),
        };
        let descriptor = resolve_logged(&field.ty, unit, field.line);

        // An embedded field still yields one member so generators can flatten it.
        let names: Vec<Option<&str>> = if field.names.is_empty() {
            vec![None]
        } else {
            field.names.iter().map(|name| Some(name.as_str())).collect()
        };

        for name in names {
            let mut member = MemberEntity::new(name, descriptor.clone());
            member.annotation = annotation.clone();
            member.docs = field.docs.clone();
            member.comments = field.comments.clone();
            members.push(member);
        }
    }

    Ok(members)
}

fn contract_members(unit: &SourceUnit, elems: &[InterfaceElem]) -> Vec<MemberEntity> {
    elems
        .iter()
        .map(|elem| match elem {
            InterfaceElem::Method(method) => method_member(unit, method),
            InterfaceElem::Embedded {
                ty,
                line,
                docs,
                comments,
            } => {
                let mut member = MemberEntity::new(None, resolve_logged(ty, unit, *line));
                member.docs = docs.clone();
                member.comments = comments.clone();
                member
            }
        })
        .collect()
}

fn method_member(unit: &SourceUnit, method: &MethodDecl) -> MemberEntity {
    let args = flatten_params(unit, &method.params, method.line);
    let results = flatten_params(unit, &method.results, method.line);

    let mut member = MemberEntity::new(
        Some(method.name.as_str()),
        TypeDescriptor::signature(render_signature(&args, &results)),
    );
    member.docs = method.docs.clone();
    member.comments = method.comments.clone();
    member.args = args;
    member.results = results;
    member
}

/// One descriptor per declared name; a shared type is repeated for each name.
fn flatten_params(
    unit: &SourceUnit,
    groups: &[ParamGroup],
    line: usize,
) -> Vec<ParameterDescriptor> {
    let mut params = Vec::new();

    for group in groups {
        let mut descriptor = resolve_logged(&group.ty, unit, line);
        if group.variadic && descriptor.is_valid() {
            descriptor = TypeDescriptor {
                full: format!("...{}", descriptor.full),
                base: descriptor.full,
                is_array: true,
                not_null: descriptor.not_null,
            };
        }

        if group.names.is_empty() {
            params.push(ParameterDescriptor {
                name: None,
                descriptor,
                variadic: group.variadic,
            });
            continue;
        }
        for name in &group.names {
            params.push(ParameterDescriptor {
                name: Some(name.clone()),
                descriptor: descriptor.clone(),
                variadic: group.variadic,
            });
        }
    }

    params
}

/// @ai:intent Render a method signature from flattened parameters
/// @ai:example ([ctx context.Context], [*User, error]) -> "func(ctx context.Context) (*User, error)"
/// @ai:effects pure
fn render_signature(args: &[ParameterDescriptor], results: &[ParameterDescriptor]) -> String {
    let join = |params: &[ParameterDescriptor]| {
        params
            .iter()
            .map(|p| match &p.name {
                Some(name) => format!("{} {}", name, p.descriptor.full),
                None => p.descriptor.full.clone(),
            })
            .collect::<Vec<_>>()
            .join(", ")
    };

    let mut signature = format!("func({})", join(args));
    match results {
        [] => {}
        [single] if single.name.is_none() => {
            signature.push(' ');
            signature.push_str(&single.descriptor.full);
        }
        _ => signature.push_str(&format!(" ({})", join(results))),
    }
    signature
}

fn resolve_logged(expr: &TypeExpr, unit: &SourceUnit, line: usize) -> TypeDescriptor {
    if let Some(TypeExpr::Other { kind, text }) = expr.first_unresolved() {
        tracing::warn!(
            "{}:{}: cannot resolve type {} ({}), emitting {}",
            unit.path.display(),
            line,
            text,
            kind,
            INVALID_TYPE
        );
    }
    resolve(expr)
}

fn locate(error: Error, unit: &SourceUnit, line: usize) -> Error {
    match error {
        Error::MalformedTag { tag, message } => Error::MalformedTag {
            tag,
            message: format!("{} at {}:{}", message, unit.path.display(), line),
        },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const MODELS: &str = r#"package model

// UserAccount holds credentials.
type UserAccount struct {
	// UserID is the owner.
	UserID    int64      `json:"user_id" db:"user_id" faker:"uuid"`
	Emails    []string   `fixture:"string:a@b.c"`
	Manager   *Employee  // optional
	Reports   []*Employee
	Labels    map[string]string
	Done      chan bool
	A, B      int
	*gorm.Model
}

type Status int

type Repository interface {
	io.Closer
	// Find looks a user up.
	Find(ctx context.Context, ids ...int64) ([]*UserAccount, error)
	Count() int
	Swap(a, b string) (x, y string)
}
"#;

    fn extract(content: &str) -> Vec<TypeEntity> {
        extract_source(Path::new("model.go"), content).unwrap()
    }

    #[test]
    fn test_extract_record() {
        let entities = extract(MODELS);
        assert_eq!(entities.len(), 2);

        let account = &entities[0];
        assert_eq!(account.kind, TypeKind::Record);
        assert_eq!(account.key, "UserAccount");
        assert_eq!(account.names.short_name, "ua");
        assert_eq!(account.names.plural_name, "UserAccounts");
        assert_eq!(account.docs, vec!["// UserAccount holds credentials."]);

        let keys: Vec<&str> = account.fields.iter().map(|f| f.key.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                "userId",
                "emails",
                "manager",
                "reports",
                "labels",
                "done",
                "a",
                "b",
                "*gorm.Model"
            ]
        );

        let user_id = &account.fields[0];
        assert_eq!(user_id.names.name, "UserID");
        assert_eq!(user_id.descriptor.full, "int64");
        assert!(user_id.descriptor.not_null);
        assert_eq!(user_id.annotation.json, "user_id");
        assert_eq!(user_id.annotation.db, "user_id");
        assert_eq!(user_id.annotation.faker, "uuid");
        assert_eq!(user_id.docs, vec!["// UserID is the owner."]);

        let emails = &account.fields[1];
        assert!(emails.descriptor.is_array);
        assert_eq!(emails.descriptor.base, "string");
        assert_eq!(emails.annotation.fixture, r#""a@b.c""#);

        let manager = &account.fields[2];
        assert!(!manager.descriptor.not_null);
        assert_eq!(manager.comments, vec!["// optional"]);

        let reports = &account.fields[3];
        assert!(reports.descriptor.is_array);
        assert!(!reports.descriptor.not_null);
        assert_eq!(reports.descriptor.base, "*Employee");

        assert_eq!(account.fields[4].descriptor.full, "map[string]string");
        assert_eq!(account.fields[5].descriptor.full, INVALID_TYPE);

        let model = &account.fields[8];
        assert!(model.is_embedded());
        assert_eq!(model.descriptor.full, "*gorm.Model");
        assert!(!model.descriptor.not_null);
    }

    #[test]
    fn test_extract_contract() {
        let entities = extract(MODELS);
        let repo = &entities[1];
        assert_eq!(repo.kind, TypeKind::Contract);
        assert_eq!(repo.key, "Repository");
        assert_eq!(repo.names.plural_name, "Repositories");
        assert_eq!(repo.fields.len(), 4);

        let closer = &repo.fields[0];
        assert!(closer.is_embedded());
        assert_eq!(closer.key, "io.Closer");

        let find = &repo.fields[1];
        assert_eq!(find.key, "find");
        assert_eq!(find.docs, vec!["// Find looks a user up."]);
        assert_eq!(
            find.descriptor.full,
            "func(ctx context.Context, ids ...int64) ([]*UserAccount, error)"
        );
        assert_eq!(find.args.len(), 2);
        assert!(find.args[1].variadic);
        assert!(find.args[1].descriptor.is_array);
        assert_eq!(find.args[1].descriptor.base, "int64");
        assert_eq!(find.results.len(), 2);
        assert!(find.results[0].descriptor.is_array);
        assert!(!find.results[0].descriptor.not_null);

        let count = &repo.fields[2];
        assert_eq!(count.descriptor.full, "func() int");
        assert!(count.args.is_empty());

        let swap = &repo.fields[3];
        let arg_names: Vec<Option<&str>> = swap.args.iter().map(|p| p.name.as_deref()).collect();
        assert_eq!(arg_names, vec![Some("a"), Some("b")]);
        assert_eq!(swap.results.len(), 2);
        assert_eq!(swap.descriptor.full, "func(a string, b string) (x string, y string)");
    }

    #[test]
    fn test_malformed_tag_aborts() {
        let content = "package m\n\ntype A struct {\n\tX int \"bad\\q\"\n}\n";
        let result = extract_source(Path::new("bad.go"), content);
        match result {
            Err(Error::MalformedTag { message, .. }) => assert!(message.contains("bad.go:4")),
            other => panic!("expected malformed tag, got {:?}", other),
        }
    }

    #[test]
    fn test_extract_file() {
        let mut file = NamedTempFile::with_suffix(".go").unwrap();
        writeln!(file, "package m\n\ntype Information struct {{\n\tID string\n}}").unwrap();

        let entities = extract_file(file.path()).unwrap();
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].names.plural_name, "Informations");
        assert_eq!(entities[0].names.plural_var_name, "informations");
        assert_eq!(entities[0].fields[0].key, "id");
    }
}
