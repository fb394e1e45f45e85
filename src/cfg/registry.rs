// Trait 实现注册表和工厂函数

use anyhow::{anyhow, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::RwLock;

use super::type_options::TypeOptions;

// 构造函数返回 Box<dyn Any>，其中实际装的是 Box<dyn Trait>
type TraitConstructor =
    Box<dyn Fn(JsonValue) -> Result<Box<dyn Any + Send + Sync>> + Send + Sync>;

// 外层 key 是 Trait 的 TypeId，内层 key 是类型名称
static TRAIT_REGISTRY: Lazy<RwLock<HashMap<TypeId, HashMap<String, TraitConstructor>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// 为实现特定 Trait 的类型注册构造函数
///
/// 同一个 Trait 可以注册多个实现，运行时根据 TypeOptions 的 `type` 字段选择
///
/// # 示例
/// ```ignore
/// register_trait::<JsonFormatter, dyn LogFormatter, JsonFormatterConfig>("JsonFormatter")?;
///
/// let formatter: Box<dyn LogFormatter> = create_trait_from_type_options(&type_options)?;
/// ```
pub fn register_trait<T, Trait, Config>(type_name: &str) -> Result<()>
where
    T: Send + Sync + 'static,
    Trait: ?Sized + Send + Sync + 'static,
    Config: DeserializeOwned + Send + Sync + 'static,
    T: From<Config>,
    Box<T>: Into<Box<Trait>>,
{
    let constructor: TraitConstructor = Box::new(|value| {
        let config: Config = serde_json::from_value(value)?;
        let trait_object: Box<Trait> = Box::new(T::from(config)).into();
        Ok(Box::new(trait_object) as Box<dyn Any + Send + Sync>)
    });

    let mut registry = TRAIT_REGISTRY
        .write()
        .map_err(|_| anyhow!("Failed to acquire write lock"))?;
    registry
        .entry(TypeId::of::<Trait>())
        .or_default()
        .insert(type_name.to_string(), constructor);

    Ok(())
}

/// 根据 TypeOptions 创建 trait object
pub fn create_trait_from_type_options<Trait>(type_options: &TypeOptions) -> Result<Box<Trait>>
where
    Trait: ?Sized + Send + Sync + 'static,
{
    let registry = TRAIT_REGISTRY
        .read()
        .map_err(|_| anyhow!("Failed to acquire read lock"))?;

    let constructor = registry
        .get(&TypeId::of::<Trait>())
        .and_then(|implementations| implementations.get(&type_options.type_name))
        .ok_or_else(|| {
            anyhow!(
                "Type '{}' not registered for this trait",
                type_options.type_name
            )
        })?;

    constructor(type_options.options.clone())?
        .downcast::<Box<Trait>>()
        .map(|boxed| *boxed)
        .map_err(|_| anyhow!("Failed to downcast to target trait type"))
}

/// 某个 Trait 下已注册的类型名称
pub fn registered_types<Trait>() -> Vec<String>
where
    Trait: ?Sized + 'static,
{
    let Ok(registry) = TRAIT_REGISTRY.read() else {
        return Vec::new();
    };
    let mut names: Vec<String> = registry
        .get(&TypeId::of::<Trait>())
        .map(|implementations| implementations.keys().cloned().collect())
        .unwrap_or_default();
    names.sort();
    names
}
