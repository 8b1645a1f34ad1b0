//! The closed kind tag carried by every declaration-tree node.

/// Kind of a declaration-tree node.
///
/// The set mirrors the subset of TypeScript's syntax kinds that can appear in
/// a declaration (`.d.ts`-shaped) tree. Expressions and statements that carry
/// no declarations are not represented.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SyntaxKind {
    // =========================================================================
    // Names and literals
    // =========================================================================
    Identifier,
    PrivateIdentifier,
    StringLiteral,
    NumericLiteral,
    QualifiedName,
    ComputedPropertyName,

    // =========================================================================
    // Containers and declarations
    // =========================================================================
    SourceFile,
    ModuleBlock,
    VariableStatement,
    VariableDeclaration,
    FunctionDeclaration,
    MethodSignature,
    MethodDeclaration,
    CallSignature,
    ConstructSignature,
    Constructor,
    IndexSignature,
    PropertySignature,
    PropertyDeclaration,
    ClassDeclaration,
    InterfaceDeclaration,
    ModuleDeclaration,
    Parameter,
    TypeAliasDeclaration,
    TypeParameter,

    // =========================================================================
    // Keyword types
    // =========================================================================
    AnyKeyword,
    UnknownKeyword,
    NumberKeyword,
    BigIntKeyword,
    StringKeyword,
    BooleanKeyword,
    SymbolKeyword,
    ObjectKeyword,
    NullKeyword,
    UndefinedKeyword,
    VoidKeyword,
    NeverKeyword,
    ThisType,
    TrueKeyword,
    FalseKeyword,

    // =========================================================================
    // Type nodes
    // =========================================================================
    TypeReference,
    TypeQuery,
    ExpressionWithTypeArguments,
    TypeLiteral,
    FunctionType,
    ConstructorType,
    ArrayType,
    TupleType,
    OptionalType,
    RestType,
    UnionType,
    IntersectionType,
    ParenthesizedType,
    TypeOperator,
    IndexedAccessType,
    MappedType,
    ConditionalType,
    InferType,
    TypePredicate,
    LiteralType,
}

impl SyntaxKind {
    /// Keyword types (`number`, `void`, `this`, ...).
    pub const fn is_keyword_type(self) -> bool {
        matches!(
            self,
            Self::AnyKeyword
                | Self::UnknownKeyword
                | Self::NumberKeyword
                | Self::BigIntKeyword
                | Self::StringKeyword
                | Self::BooleanKeyword
                | Self::SymbolKeyword
                | Self::ObjectKeyword
                | Self::NullKeyword
                | Self::UndefinedKeyword
                | Self::VoidKeyword
                | Self::NeverKeyword
                | Self::ThisType
        )
    }

    /// Nodes that can appear in a type position.
    pub const fn is_type_node(self) -> bool {
        self.is_keyword_type()
            || matches!(
                self,
                Self::TypeReference
                    | Self::TypeQuery
                    | Self::ExpressionWithTypeArguments
                    | Self::TypeLiteral
                    | Self::FunctionType
                    | Self::ConstructorType
                    | Self::ArrayType
                    | Self::TupleType
                    | Self::OptionalType
                    | Self::RestType
                    | Self::UnionType
                    | Self::IntersectionType
                    | Self::ParenthesizedType
                    | Self::TypeOperator
                    | Self::IndexedAccessType
                    | Self::MappedType
                    | Self::ConditionalType
                    | Self::InferType
                    | Self::TypePredicate
                    | Self::LiteralType
            )
    }

    /// Signature-like nodes sharing [`SignatureData`](crate::SignatureData).
    pub const fn is_signature(self) -> bool {
        matches!(
            self,
            Self::FunctionDeclaration
                | Self::MethodSignature
                | Self::MethodDeclaration
                | Self::CallSignature
                | Self::ConstructSignature
                | Self::Constructor
                | Self::IndexSignature
                | Self::FunctionType
                | Self::ConstructorType
        )
    }

    /// Nodes that name something (identifiers and their composites).
    pub const fn is_name(self) -> bool {
        matches!(
            self,
            Self::Identifier
                | Self::PrivateIdentifier
                | Self::StringLiteral
                | Self::NumericLiteral
                | Self::QualifiedName
                | Self::ComputedPropertyName
        )
    }
}

impl std::fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}
