//! @ai:module:intent Parse Go source files into type declarations with attached comments
//! @ai:module:layer application
//! @ai:module:public_api parse_file, parse_source, SourceUnit, TypeDecl, DeclShape, FieldDecl, InterfaceElem, MethodDecl, ParamGroup
//! @ai:module:depends_on language, descriptor, error
//! @ai:module:stateless true

use crate::descriptor::TypeExpr;
use crate::error::{Error, Result};
use crate::language::{grammar, is_supported_file};
use std::path::{Path, PathBuf};
use tree_sitter::{Node, Parser};

/// @ai:intent Type declarations found in one Go source file
#[derive(Debug, Clone)]
pub struct SourceUnit {
    pub path: PathBuf,
    pub declarations: Vec<TypeDecl>,
}

/// @ai:intent One `type Name <shape>` spec with its comments
#[derive(Debug, Clone)]
pub struct TypeDecl {
    pub name: String,
    pub line: usize,
    pub shape: DeclShape,
    pub docs: Vec<String>,
    pub comments: Vec<String>,
}

/// @ai:intent Shape of the type a declaration introduces
#[derive(Debug, Clone)]
pub enum DeclShape {
    Struct(Vec<FieldDecl>),
    Interface(Vec<InterfaceElem>),
    /// Aliases, named scalars, function types and the like, by node kind.
    Other(String),
}

/// @ai:intent One line of a struct body; `names` is empty for embedded fields
#[derive(Debug, Clone)]
pub struct FieldDecl {
    pub names: Vec<String>,
    pub ty: TypeExpr,
    /// Tag literal as written, quotes included.
    pub tag: Option<String>,
    pub line: usize,
    pub docs: Vec<String>,
    pub comments: Vec<String>,
}

#[derive(Debug, Clone)]
pub enum InterfaceElem {
    Method(MethodDecl),
    Embedded {
        ty: TypeExpr,
        line: usize,
        docs: Vec<String>,
        comments: Vec<String>,
    },
}

#[derive(Debug, Clone)]
pub struct MethodDecl {
    pub name: String,
    pub params: Vec<ParamGroup>,
    pub results: Vec<ParamGroup>,
    pub line: usize,
    pub docs: Vec<String>,
    pub comments: Vec<String>,
}

/// @ai:intent Parameters sharing one type, as in `a, b int`
#[derive(Debug, Clone)]
pub struct ParamGroup {
    pub names: Vec<String>,
    pub ty: TypeExpr,
    pub variadic: bool,
}

/// A comment node with enough position data to attach it to declarations.
#[derive(Debug, Clone)]
struct CommentLine {
    start_row: usize,
    end_row: usize,
    start_byte: usize,
    end_byte: usize,
    text: String,
    /// Nothing but whitespace precedes the comment on its first line.
    standalone: bool,
}

/// Every comment of a file, in source order.
struct CommentIndex {
    lines: Vec<CommentLine>,
}

/// @ai:intent Read and parse a Go source file
/// @ai:pre path exists and is readable
/// @ai:effects fs:read
pub fn parse_file(path: &Path) -> Result<SourceUnit> {
    if !is_supported_file(path) {
        return Err(Error::UnsupportedFileType(path.display().to_string()));
    }

    let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    parse_source(path, &content)
}

/// @ai:intent Parse Go source text into its type declarations
/// @ai:post Err(Parse) when the text is not well-formed Go
/// @ai:effects pure
pub fn parse_source(path: &Path, content: &str) -> Result<SourceUnit> {
    let mut parser = Parser::new();
    parser.set_language(&grammar())?;

    let tree = parser.parse(content, None).ok_or_else(|| Error::Parse {
        file: path.to_path_buf(),
        line: 0,
        message: "parser produced no tree".to_string(),
    })?;
    let root = tree.root_node();
    let source = content.as_bytes();

    if let Some(bad) = first_error(root) {
        let message = if bad.is_missing() {
            format!("missing {}", bad.kind())
        } else {
            format!("unexpected {}", snippet(text(bad, source)))
        };
        return Err(Error::Parse {
            file: path.to_path_buf(),
            line: line_of(bad),
            message,
        });
    }

    let mut cursor = root.walk();
    let has_package = root
        .named_children(&mut cursor)
        .any(|child| child.kind() == "package_clause");
    if !has_package {
        return Err(Error::Parse {
            file: path.to_path_buf(),
            line: 1,
            message: "expected package clause".to_string(),
        });
    }

    let comments = CommentIndex::build(root, source);
    let mut declarations = Vec::new();

    let mut cursor = root.walk();
    for decl in root.named_children(&mut cursor) {
        if decl.kind() != "type_declaration" {
            continue;
        }
        let group_docs = comments.docs_above(decl);

        let mut spec_cursor = decl.walk();
        for spec in decl.named_children(&mut spec_cursor) {
            if spec.kind() != "type_spec" && spec.kind() != "type_alias" {
                continue;
            }
            let mut docs = comments.docs_above(spec);
            if docs.is_empty() {
                docs = group_docs.clone();
            }

            declarations.push(TypeDecl {
                name: field_text(spec, "name", source),
                line: line_of(spec),
                shape: decl_shape(spec, source, &comments),
                docs,
                comments: comments.trailing(spec),
            });
        }
    }

    Ok(SourceUnit {
        path: path.to_path_buf(),
        declarations,
    })
}

fn decl_shape(spec: Node, source: &[u8], comments: &CommentIndex) -> DeclShape {
    // `type A = B` never introduces a new struct or interface.
    if spec.kind() == "type_alias" {
        return DeclShape::Other("type_alias".to_string());
    }
    let Some(ty) = spec.child_by_field_name("type") else {
        return DeclShape::Other("missing".to_string());
    };

    match ty.kind() {
        "struct_type" => DeclShape::Struct(struct_fields(ty, source, comments)),
        "interface_type" => DeclShape::Interface(interface_elems(ty, source, comments)),
        other => DeclShape::Other(other.to_string()),
    }
}

fn struct_fields(struct_type: Node, source: &[u8], comments: &CommentIndex) -> Vec<FieldDecl> {
    let mut fields = Vec::new();
    let mut cursor = struct_type.walk();
    let Some(list) = struct_type
        .named_children(&mut cursor)
        .find(|child| child.kind() == "field_declaration_list")
    else {
        return fields;
    };

    let mut cursor = list.walk();
    for field in list.named_children(&mut cursor) {
        if field.kind() != "field_declaration" {
            continue;
        }

        let mut name_cursor = field.walk();
        let names: Vec<String> = field
            .children_by_field_name("name", &mut name_cursor)
            .map(|name| text(name, source).to_string())
            .collect();

        let mut ty = field_type(field, source);
        if names.is_empty() && has_token(field, "*") {
            ty = TypeExpr::Pointer(Box::new(ty));
        }

        fields.push(FieldDecl {
            names,
            ty,
            tag: field
                .child_by_field_name("tag")
                .map(|tag| text(tag, source).to_string()),
            line: line_of(field),
            docs: comments.docs_above(field),
            comments: comments.trailing(field),
        });
    }

    fields
}

fn interface_elems(
    interface_type: Node,
    source: &[u8],
    comments: &CommentIndex,
) -> Vec<InterfaceElem> {
    let mut elems = Vec::new();
    let mut cursor = interface_type.walk();

    for elem in interface_type.named_children(&mut cursor) {
        match elem.kind() {
            "method_elem" => elems.push(InterfaceElem::Method(MethodDecl {
                name: field_text(elem, "name", source),
                params: elem
                    .child_by_field_name("parameters")
                    .map(|list| param_groups(list, source))
                    .unwrap_or_default(),
                results: elem
                    .child_by_field_name("result")
                    .map(|result| result_groups(result, source))
                    .unwrap_or_default(),
                line: line_of(elem),
                docs: comments.docs_above(elem),
                comments: comments.trailing(elem),
            })),
            "type_elem" => elems.push(InterfaceElem::Embedded {
                ty: type_expr(elem, source),
                line: line_of(elem),
                docs: comments.docs_above(elem),
                comments: comments.trailing(elem),
            }),
            _ => {}
        }
    }

    elems
}

fn result_groups(result: Node, source: &[u8]) -> Vec<ParamGroup> {
    if result.kind() == "parameter_list" {
        return param_groups(result, source);
    }
    vec![ParamGroup {
        names: Vec::new(),
        ty: type_expr(result, source),
        variadic: false,
    }]
}

fn param_groups(list: Node, source: &[u8]) -> Vec<ParamGroup> {
    let mut groups = Vec::new();
    let mut cursor = list.walk();

    for param in list.named_children(&mut cursor) {
        let variadic = match param.kind() {
            "parameter_declaration" => false,
            "variadic_parameter_declaration" => true,
            _ => continue,
        };
        let mut name_cursor = param.walk();
        let names = param
            .children_by_field_name("name", &mut name_cursor)
            .map(|name| text(name, source).to_string())
            .collect();

        groups.push(ParamGroup {
            names,
            ty: field_type(param, source),
            variadic,
        });
    }

    groups
}

fn field_type(node: Node, source: &[u8]) -> TypeExpr {
    match node.child_by_field_name("type") {
        Some(ty) => type_expr(ty, source),
        None => TypeExpr::Other {
            kind: "missing".to_string(),
            text: text(node, source).to_string(),
        },
    }
}

/// @ai:intent Convert a tree-sitter type node into the closed TypeExpr shape set
/// @ai:effects pure
fn type_expr(node: Node, source: &[u8]) -> TypeExpr {
    let converted = match node.kind() {
        "type_identifier" => Some(TypeExpr::Name(text(node, source).to_string())),
        "qualified_type" => Some(TypeExpr::Qualified {
            package: field_text(node, "package", source),
            name: field_text(node, "name", source),
        }),
        "pointer_type" => node
            .named_child(0)
            .map(|inner| TypeExpr::Pointer(Box::new(type_expr(inner, source)))),
        "slice_type" => node.child_by_field_name("element").map(|elem| TypeExpr::Array {
            len: None,
            elem: Box::new(type_expr(elem, source)),
        }),
        "array_type" => node.child_by_field_name("element").map(|elem| TypeExpr::Array {
            len: Some(field_text(node, "length", source)),
            elem: Box::new(type_expr(elem, source)),
        }),
        "map_type" => match (
            node.child_by_field_name("key"),
            node.child_by_field_name("value"),
        ) {
            (Some(key), Some(value)) => Some(TypeExpr::Map {
                key: Box::new(type_expr(key, source)),
                value: Box::new(type_expr(value, source)),
            }),
            _ => None,
        },
        "parenthesized_type" => node.named_child(0).map(|inner| type_expr(inner, source)),
        // A single-term element: embedded interface or constraint.
        "type_elem" | "type_constraint" if node.named_child_count() == 1 => {
            node.named_child(0).map(|inner| type_expr(inner, source))
        }
        _ => None,
    };

    converted.unwrap_or_else(|| TypeExpr::Other {
        kind: node.kind().to_string(),
        text: text(node, source).to_string(),
    })
}

impl CommentIndex {
    fn build(root: Node, source: &[u8]) -> Self {
        let mut lines = Vec::new();
        let mut cursor = root.walk();

        // Pre-order walk; comments arrive in source order.
        'walk: loop {
            let node = cursor.node();
            if node.kind() == "comment" {
                let line_start = source[..node.start_byte()]
                    .iter()
                    .rposition(|&b| b == b'\n')
                    .map_or(0, |pos| pos + 1);
                lines.push(CommentLine {
                    start_row: node.start_position().row,
                    end_row: node.end_position().row,
                    start_byte: node.start_byte(),
                    end_byte: node.end_byte(),
                    text: text(node, source).to_string(),
                    standalone: source[line_start..node.start_byte()]
                        .iter()
                        .all(|b| b.is_ascii_whitespace()),
                });
            }

            if cursor.goto_first_child() {
                continue;
            }
            while !cursor.goto_next_sibling() {
                if !cursor.goto_parent() {
                    break 'walk;
                }
            }
        }

        Self { lines }
    }

    /// Run of stand-alone comments ending on the line right above `node`.
    fn docs_above(&self, node: Node) -> Vec<String> {
        let mut docs = Vec::new();
        let mut next_row = node.start_position().row;

        for comment in self
            .lines
            .iter()
            .rev()
            .filter(|c| c.end_byte <= node.start_byte())
        {
            if !comment.standalone || comment.end_row + 1 != next_row {
                break;
            }
            docs.push(comment.text.clone());
            next_row = comment.start_row;
        }

        docs.reverse();
        docs
    }

    /// Comments starting after `node` on the line where it ends.
    fn trailing(&self, node: Node) -> Vec<String> {
        let row = node.end_position().row;
        self.lines
            .iter()
            .filter(|c| c.start_byte >= node.end_byte() && c.start_row == row)
            .map(|c| c.text.clone())
            .collect()
    }
}

fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error)
}

fn has_token(node: Node, token: &str) -> bool {
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .any(|child| !child.is_named() && child.kind() == token);
    found
}

fn field_text(node: Node, field: &str, source: &[u8]) -> String {
    node.child_by_field_name(field)
        .map(|child| text(child, source).to_string())
        .unwrap_or_default()
}

fn text<'a>(node: Node, source: &'a [u8]) -> &'a str {
    node.utf8_text(source).unwrap_or("")
}

fn line_of(node: Node) -> usize {
    node.start_position().row + 1
}

fn snippet(text: &str) -> String {
    let first_line = text.lines().next().unwrap_or("");
    if first_line.chars().count() > 40 {
        format!("{:?}...", first_line.chars().take(40).collect::<String>())
    } else {
        format!("{:?}", first_line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn parse(content: &str) -> SourceUnit {
        parse_source(Path::new("model.go"), content).unwrap()
    }

    #[test]
    fn test_struct_fields_and_tags() {
        let unit = parse(
            r#"package model

type User struct {
	ID, ParentID int64 `json:"id"`
	Name string
	*Base
	time.Time
}
"#,
        );
        assert_eq!(unit.declarations.len(), 1);
        let decl = &unit.declarations[0];
        assert_eq!(decl.name, "User");
        assert_eq!(decl.line, 3);

        let DeclShape::Struct(fields) = &decl.shape else {
            panic!("expected struct, got {:?}", decl.shape);
        };
        assert_eq!(fields.len(), 4);
        assert_eq!(fields[0].names, vec!["ID".to_string(), "ParentID".to_string()]);
        assert_eq!(fields[0].tag.as_deref(), Some(r#"`json:"id"`"#));
        assert_eq!(fields[1].tag, None);
        assert!(fields[2].names.is_empty());
        assert_eq!(
            fields[2].ty,
            TypeExpr::Pointer(Box::new(TypeExpr::Name("Base".to_string())))
        );
        assert_eq!(
            fields[3].ty,
            TypeExpr::Qualified {
                package: "time".to_string(),
                name: "Time".to_string()
            }
        );
    }

    #[test]
    fn test_type_expressions() {
        let unit = parse(
            "package m\n\ntype T struct {\n\tA []*User\n\tB map[string][4]int\n\tC chan int\n\tD (*X)\n}\n",
        );
        let DeclShape::Struct(fields) = &unit.declarations[0].shape else {
            panic!("expected struct");
        };

        let user = TypeExpr::Pointer(Box::new(TypeExpr::Name("User".to_string())));
        assert_eq!(
            fields[0].ty,
            TypeExpr::Array {
                len: None,
                elem: Box::new(user)
            }
        );
        assert_eq!(
            fields[1].ty,
            TypeExpr::Map {
                key: Box::new(TypeExpr::Name("string".to_string())),
                value: Box::new(TypeExpr::Array {
                    len: Some("4".to_string()),
                    elem: Box::new(TypeExpr::Name("int".to_string())),
                }),
            }
        );
        assert!(matches!(&fields[2].ty, TypeExpr::Other { kind, .. } if kind == "channel_type"));
        assert_eq!(
            fields[3].ty,
            TypeExpr::Pointer(Box::new(TypeExpr::Name("X".to_string())))
        );
    }

    #[test]
    fn test_docs_and_trailing_comments() {
        let unit = parse(
            r#"package model

// Account is a login.
// It has an owner.
type Account struct {
	// Owner of the account.
	Owner string // trailing
	Plan  string
} // account comment

// detached

type Other struct{}
"#,
        );
        let account = &unit.declarations[0];
        assert_eq!(
            account.docs,
            vec!["// Account is a login.", "// It has an owner."]
        );
        assert_eq!(account.comments, vec!["// account comment"]);

        let DeclShape::Struct(fields) = &account.shape else {
            panic!("expected struct");
        };
        assert_eq!(fields[0].docs, vec!["// Owner of the account."]);
        assert_eq!(fields[0].comments, vec!["// trailing"]);
        assert!(fields[1].docs.is_empty());
        assert!(fields[1].comments.is_empty());

        assert!(unit.declarations[1].docs.is_empty());
    }

    #[test]
    fn test_grouped_declarations_fall_back_to_group_docs() {
        let unit = parse(
            r#"package model

// Models.
type (
	// Cat doc.
	Cat struct{}
	Dog struct{}
)
"#,
        );
        assert_eq!(unit.declarations[0].docs, vec!["// Cat doc."]);
        assert_eq!(unit.declarations[1].docs, vec!["// Models."]);
    }

    #[test]
    fn test_interface_methods() {
        let unit = parse(
            r#"package store

type Store interface {
	io.Closer
	Get(ctx context.Context, a, b int64) (*User, error)
	Put(items ...Item) error
	Ping()
}
"#,
        );
        let DeclShape::Interface(elems) = &unit.declarations[0].shape else {
            panic!("expected interface");
        };
        assert_eq!(elems.len(), 4);
        assert!(matches!(
            &elems[0],
            InterfaceElem::Embedded { ty: TypeExpr::Qualified { package, name }, .. }
                if package == "io" && name == "Closer"
        ));

        let InterfaceElem::Method(get) = &elems[1] else {
            panic!("expected method");
        };
        assert_eq!(get.name, "Get");
        assert_eq!(get.params.len(), 2);
        assert_eq!(get.params[1].names, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(get.results.len(), 2);
        assert!(get.results[0].names.is_empty());

        let InterfaceElem::Method(put) = &elems[2] else {
            panic!("expected method");
        };
        assert!(put.params[0].variadic);
        assert_eq!(put.results.len(), 1);

        let InterfaceElem::Method(ping) = &elems[3] else {
            panic!("expected method");
        };
        assert!(ping.params.is_empty());
        assert!(ping.results.is_empty());
    }

    #[test]
    fn test_other_shapes_are_classified() {
        let unit = parse("package m\n\ntype ID int64\ntype Alias = User\ntype Fn func()\n");
        let kinds: Vec<String> = unit
            .declarations
            .iter()
            .map(|d| match &d.shape {
                DeclShape::Other(kind) => kind.clone(),
                _ => "record-or-contract".to_string(),
            })
            .collect();
        assert_eq!(kinds, vec!["type_identifier", "type_alias", "function_type"]);
    }

    #[test]
    fn test_syntax_error_is_fatal() {
        let result = parse_source(Path::new("bad.go"), "package m\n\ntype Broken struct {\n\tName string\n");
        assert!(matches!(result, Err(Error::Parse { .. })));
    }

    #[test]
    fn test_missing_package_is_fatal() {
        let result = parse_source(Path::new("bad.go"), "type A struct{}\n");
        assert!(matches!(result, Err(Error::Parse { line: 1, .. })));
    }

    #[test]
    fn test_parse_file_reads_disk() {
        let mut file = NamedTempFile::with_suffix(".go").unwrap();
        writeln!(file, "package m\n\ntype A struct {{\n\tX int\n}}").unwrap();

        let unit = parse_file(file.path()).unwrap();
        assert_eq!(unit.path, file.path());
        assert_eq!(unit.declarations[0].name, "A");
    }
}
