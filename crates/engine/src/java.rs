//! Java names the builder and the visibility rules rely on.

pub const JAVA_LANG: &str = "java.lang";
pub const JAVA_IO: &str = "java.io";
/// Packages every compilation unit sees without an import.
pub const IMPLICIT_PACKAGES: [&str; 2] = [JAVA_LANG, JAVA_IO];

/// Superclass of every class without an `extends` clause.
pub const JAVA_LANG_OBJECT: &str = "java.lang.Object";
/// Supertype of every enum.
pub const JAVA_LANG_ENUM: &str = "java.lang.Enum";

pub const PACKAGE_SEPARATOR: &str = ".";

pub const PUBLIC: &str = "public";
pub const PROTECTED: &str = "protected";
pub const PRIVATE: &str = "private";
pub const STATIC: &str = "static";
pub const FINAL: &str = "final";

pub const ACCESS_MODIFIERS: [&str; 3] = [PUBLIC, PROTECTED, PRIVATE];
