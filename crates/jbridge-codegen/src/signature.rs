//! JNI type descriptors and member signatures

use jbridge_core::{
    BridgeError, BridgeResult, Constructor, Field, Method, ReflectionProvider, TypeRef,
};

/// JNI descriptor of an erased type: `I`, `[J`, `Ljava/lang/String;`
pub fn descriptor<P: ReflectionProvider + ?Sized>(
    provider: &P,
    ty: &TypeRef,
) -> BridgeResult<String> {
    match ty {
        TypeRef::Array(element) => Ok(format!("[{}", descriptor(provider, element)?)),
        TypeRef::Plain(id) => {
            let class = provider.class(*id);
            Ok(match class.primitive() {
                Some(primitive) => primitive.descriptor().to_string(),
                None => format!("L{};", class.name.replace('.', "/")),
            })
        }
        TypeRef::Parameterized { .. }
        | TypeRef::Wildcard { .. }
        | TypeRef::TypeVariable { .. }
        | TypeRef::GenericArray(_) => Err(BridgeError::UnsupportedType {
            kind: ty.kind(),
            context: "JNI descriptor".to_string(),
        }),
    }
}

/// Parenthesized parameter descriptors: `(ILjava/lang/String;)`
pub fn parameters<P: ReflectionProvider + ?Sized>(
    provider: &P,
    params: &[TypeRef],
) -> BridgeResult<String> {
    let mut sig = String::from("(");
    for param in params {
        sig.push_str(&descriptor(provider, param)?);
    }
    sig.push(')');
    Ok(sig)
}

/// Full method signature: `(I)Ljava/lang/String;`
pub fn method<P: ReflectionProvider + ?Sized>(provider: &P, method: &Method) -> BridgeResult<String> {
    Ok(format!(
        "{}{}",
        parameters(provider, &method.parameter_types)?,
        descriptor(provider, &method.return_type)?
    ))
}

/// Constructor signature, always returning `V`
pub fn constructor<P: ReflectionProvider + ?Sized>(
    provider: &P,
    constructor: &Constructor,
) -> BridgeResult<String> {
    Ok(format!("{}V", parameters(provider, &constructor.parameter_types)?))
}

/// Field signature: the descriptor of its type
pub fn field<P: ReflectionProvider + ?Sized>(provider: &P, field: &Field) -> BridgeResult<String> {
    descriptor(provider, &field.field_type)
}

/// JNI class name: `java/lang/String`
pub fn class_path(dotted: &str) -> String {
    dotted.replace('.', "/")
}
