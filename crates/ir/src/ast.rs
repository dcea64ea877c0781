//! Declaration-level syntax of one Java compilation unit.
//!
//! The parser lowers its concrete syntax tree into these values and the
//! engine walks them (see [`walk`](crate::walk)). Only declarations are
//! kept; statements and expressions survive only as the local and
//! anonymous classes they contain.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
/// 1-based source range of a construct.
pub struct Span {
    pub start_line: usize,
    pub start_column: usize,
    pub stop_line: usize,
    pub stop_column: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompilationUnit {
    /// Path of the source file as given to the parser.
    pub source_name: String,
    pub package: Option<PackageDecl>,
    pub imports: Vec<ImportDecl>,
    pub types: Vec<TypeDecl>,
}

impl CompilationUnit {
    pub fn new(source_name: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            ..Default::default()
        }
    }

    /// True when nothing at all was declared.
    pub fn is_empty(&self) -> bool {
        self.package.is_none() && self.imports.is_empty() && self.types.is_empty()
    }

    /// File name portion of `source_name`.
    pub fn file_name(&self) -> &str {
        self.source_name
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(&self.source_name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageDecl {
    /// `a.b.c` split on dots.
    pub segments: Vec<String>,
    pub span: Span,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportDecl {
    /// Dotted path without the trailing `.*`.
    pub path: String,
    pub is_static: bool,
    pub on_demand: bool,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeKind {
    Class,
    Interface,
    Enum,
    Annotation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeDecl {
    pub kind: TypeKind,
    /// Declared name, or the instantiated type for anonymous classes.
    pub name: String,
    /// Keywords and annotations in source order.
    pub modifiers: Vec<String>,
    pub type_parameters: Vec<TypeParameterDecl>,
    pub superclass: Option<String>,
    /// `implements` list of classes and enums, `extends` list of interfaces.
    pub interfaces: Vec<String>,
    pub members: Vec<MemberDecl>,
    /// Declared as `new T() { ... }`.
    pub anonymous: bool,
    pub span: Span,
}

impl TypeDecl {
    pub fn new(kind: TypeKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            modifiers: Vec::new(),
            type_parameters: Vec::new(),
            superclass: None,
            interfaces: Vec::new(),
            members: Vec::new(),
            anonymous: false,
            span: Span::default(),
        }
    }

    pub fn has_constructor(&self) -> bool {
        self.members
            .iter()
            .any(|m| matches!(m, MemberDecl::Constructor(_)))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MemberDecl {
    Type(TypeDecl),
    Constructor(CallableDecl),
    Method(CallableDecl),
    Field(FieldDecl),
    EnumConstant(EnumConstantDecl),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeParameterDecl {
    pub name: String,
    pub bounds: Vec<String>,
    pub span: Span,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Constructor, method or annotation element.
pub struct CallableDecl {
    pub name: String,
    pub modifiers: Vec<String>,
    pub type_parameters: Vec<TypeParameterDecl>,
    pub parameters: Vec<ParameterDecl>,
    /// `None` for constructors.
    pub return_type: Option<String>,
    /// Classes declared or instantiated anonymously inside the body.
    pub local_types: Vec<TypeDecl>,
    pub span: Span,
}

impl CallableDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            modifiers: Vec::new(),
            type_parameters: Vec::new(),
            parameters: Vec::new(),
            return_type: None,
            local_types: Vec::new(),
            span: Span::default(),
        }
    }

    /// Parameter types without whitespace, e.g. `(int,List<String>,Object...)`.
    pub fn signature(&self) -> String {
        let types: Vec<String> = self
            .parameters
            .iter()
            .map(|p| {
                let mut t: String = p.declared_type.split_whitespace().collect();
                if p.variadic {
                    t.push_str("...");
                }
                t
            })
            .collect();
        format!("({})", types.join(","))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterDecl {
    pub name: String,
    pub modifiers: Vec<String>,
    pub declared_type: String,
    pub variadic: bool,
    pub span: Span,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// One field declaration; `int a, b;` has two names.
pub struct FieldDecl {
    pub names: Vec<String>,
    pub modifiers: Vec<String>,
    pub declared_type: String,
    /// Interface constant, implicitly `public static final`.
    pub constant: bool,
    pub span: Span,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnumConstantDecl {
    pub name: String,
    pub modifiers: Vec<String>,
    /// Members of the constant's class body, if it has one.
    pub body: Option<Vec<MemberDecl>>,
    pub span: Span,
}
