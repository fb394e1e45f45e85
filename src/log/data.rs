use serde::de::Deserializer;
use serde::ser::Error as _;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;

/// 数据字段值，支持多种类型
#[derive(Debug, Clone)]
pub enum DataValue {
    String(String),
    I64(i64),
    U64(u64),
    F64(f64),
    Bool(bool),
    Null,
    /// 任意 JSON 兼容的数据
    Json(Value),
    /// 自定义结构体（内部序列化为 JSON）
    Struct(Value),
    /// 无法编码为 JSON 的值，序列化阶段才报告错误
    Unencodable {
        type_name: &'static str,
        reason: String,
    },
}

impl DataValue {
    /// 从任意实现了 Serialize 的自定义结构体创建 DataValue
    ///
    /// 编码失败不会在这里报错，而是记录为 `Unencodable`，
    /// 由格式化器在输出时处理
    ///
    /// # 示例
    ///
    /// ```ignore
    /// #[derive(Serialize)]
    /// struct User {
    ///     id: i64,
    ///     name: String,
    /// }
    ///
    /// let user = User { id: 123, name: "alice".to_string() };
    /// let value = DataValue::from_struct(user);
    /// ```
    pub fn from_struct<T: Serialize>(value: T) -> Self {
        match serde_json::to_value(value) {
            Ok(json_value) => DataValue::Struct(json_value),
            Err(e) => DataValue::Unencodable {
                type_name: std::any::type_name::<T>(),
                reason: e.to_string(),
            },
        }
    }

    /// 转换为 JSON 值，无法编码的值返回 None
    pub fn to_json(&self) -> Option<Value> {
        match self {
            DataValue::String(s) => Some(Value::String(s.clone())),
            DataValue::I64(n) => Some(Value::from(*n)),
            DataValue::U64(n) => Some(Value::from(*n)),
            DataValue::F64(n) => Some(Value::from(*n)),
            DataValue::Bool(b) => Some(Value::Bool(*b)),
            DataValue::Null => Some(Value::Null),
            DataValue::Json(v) | DataValue::Struct(v) => Some(v.clone()),
            DataValue::Unencodable { .. } => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            DataValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl PartialEq for DataValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                DataValue::Unencodable {
                    type_name: a_type,
                    reason: a_reason,
                },
                DataValue::Unencodable {
                    type_name: b_type,
                    reason: b_reason,
                },
            ) => a_type == b_type && a_reason == b_reason,
            // 数值类型按 JSON 语义比较，I64(1) 与 U64(1) 相等
            _ => match (self.to_json(), other.to_json()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }
}

impl Serialize for DataValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            DataValue::String(s) => serializer.serialize_str(s),
            DataValue::I64(n) => serializer.serialize_i64(*n),
            DataValue::U64(n) => serializer.serialize_u64(*n),
            DataValue::F64(n) => serializer.serialize_f64(*n),
            DataValue::Bool(b) => serializer.serialize_bool(*b),
            DataValue::Null => serializer.serialize_none(),
            DataValue::Json(v) => v.serialize(serializer),
            DataValue::Struct(v) => v.serialize(serializer),
            DataValue::Unencodable { type_name, reason } => Err(S::Error::custom(format!(
                "cannot encode value of type {}: {}",
                type_name, reason
            ))),
        }
    }
}

impl<'de> Deserialize<'de> for DataValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(DataValue::from(Value::deserialize(deserializer)?))
    }
}

impl fmt::Display for DataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataValue::String(s) => write!(f, "{}", s),
            DataValue::I64(n) => write!(f, "{}", n),
            DataValue::U64(n) => write!(f, "{}", n),
            DataValue::F64(n) => write!(f, "{}", n),
            DataValue::Bool(b) => write!(f, "{}", b),
            DataValue::Null => write!(f, "null"),
            DataValue::Json(v) => write!(f, "'{}'", v),
            DataValue::Struct(v) => write!(f, "'{}'", v),
            DataValue::Unencodable { type_name, .. } => write!(f, "<unencodable {}>", type_name),
        }
    }
}

impl From<String> for DataValue {
    fn from(s: String) -> Self {
        DataValue::String(s)
    }
}

impl From<&str> for DataValue {
    fn from(s: &str) -> Self {
        DataValue::String(s.to_string())
    }
}

impl From<&String> for DataValue {
    fn from(s: &String) -> Self {
        DataValue::String(s.clone())
    }
}

impl From<i64> for DataValue {
    fn from(n: i64) -> Self {
        DataValue::I64(n)
    }
}

impl From<i32> for DataValue {
    fn from(n: i32) -> Self {
        DataValue::I64(n as i64)
    }
}

impl From<u64> for DataValue {
    fn from(n: u64) -> Self {
        DataValue::U64(n)
    }
}

impl From<u32> for DataValue {
    fn from(n: u32) -> Self {
        DataValue::U64(n as u64)
    }
}

impl From<usize> for DataValue {
    fn from(n: usize) -> Self {
        DataValue::U64(n as u64)
    }
}

impl From<f64> for DataValue {
    fn from(n: f64) -> Self {
        DataValue::F64(n)
    }
}

impl From<f32> for DataValue {
    fn from(n: f32) -> Self {
        DataValue::F64(n as f64)
    }
}

impl From<bool> for DataValue {
    fn from(b: bool) -> Self {
        DataValue::Bool(b)
    }
}

impl<T: Into<DataValue>> From<Option<T>> for DataValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(DataValue::Null, Into::into)
    }
}

impl From<Value> for DataValue {
    fn from(v: Value) -> Self {
        match v {
            Value::Null => DataValue::Null,
            Value::Bool(b) => DataValue::Bool(b),
            Value::String(s) => DataValue::String(s),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    DataValue::I64(i)
                } else if let Some(u) = n.as_u64() {
                    DataValue::U64(u)
                } else {
                    DataValue::F64(n.as_f64().unwrap_or_default())
                }
            }
            other => DataValue::Json(other),
        }
    }
}

/// 日志数据上下文
///
/// 扁平的 key -> value 映射，key 唯一，后写入的值覆盖先写入的值
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Data(BTreeMap<String, DataValue>);

impl Data {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<DataValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&DataValue> {
        self.0.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<DataValue> {
        self.0.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, DataValue> {
        self.0.iter()
    }

    pub fn iter_mut(&mut self) -> btree_map::IterMut<'_, String, DataValue> {
        self.0.iter_mut()
    }

    /// 合并字段，新值覆盖同名旧值
    pub fn merge(&mut self, other: impl IntoIterator<Item = (impl Into<String>, DataValue)>) {
        for (key, value) in other {
            self.0.insert(key.into(), value);
        }
    }

    /// 返回合并后的新 Data，自身不变
    pub fn merged(
        &self,
        other: impl IntoIterator<Item = (impl Into<String>, DataValue)>,
    ) -> Self {
        let mut data = self.clone();
        data.merge(other);
        data
    }

    /// 是否所有值都可以编码为 JSON
    pub fn is_encodable(&self) -> bool {
        self.0
            .values()
            .all(|v| !matches!(v, DataValue::Unencodable { .. }))
    }
}

impl<K: Into<String>> FromIterator<(K, DataValue)> for Data {
    fn from_iter<I: IntoIterator<Item = (K, DataValue)>>(iter: I) -> Self {
        let mut data = Data::new();
        data.merge(iter);
        data
    }
}

impl<K: Into<String>> Extend<(K, DataValue)> for Data {
    fn extend<I: IntoIterator<Item = (K, DataValue)>>(&mut self, iter: I) {
        self.merge(iter);
    }
}

impl IntoIterator for Data {
    type Item = (String, DataValue);
    type IntoIter = btree_map::IntoIter<String, DataValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Data {
    type Item = (&'a String, &'a DataValue);
    type IntoIter = btree_map::Iter<'a, String, DataValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl From<BTreeMap<String, DataValue>> for Data {
    fn from(map: BTreeMap<String, DataValue>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_data_value_display() {
        assert_eq!(format!("{}", DataValue::String("hello".to_string())), "hello");
        assert_eq!(format!("{}", DataValue::I64(42)), "42");
        assert_eq!(format!("{}", DataValue::U64(100)), "100");
        assert_eq!(format!("{}", DataValue::F64(3.5)), "3.5");
        assert_eq!(format!("{}", DataValue::Bool(false)), "false");
        assert_eq!(format!("{}", DataValue::Null), "null");
        assert_eq!(format!("{}", DataValue::Json(json!({"a": 1}))), "'{\"a\":1}'");
    }

    #[test]
    fn test_data_value_serialize() {
        assert_eq!(serde_json::to_string(&DataValue::from("hello")).unwrap(), "\"hello\"");
        assert_eq!(serde_json::to_string(&DataValue::I64(-42)).unwrap(), "-42");
        assert_eq!(serde_json::to_string(&DataValue::U64(100)).unwrap(), "100");
        assert_eq!(serde_json::to_string(&DataValue::Bool(true)).unwrap(), "true");
        assert_eq!(serde_json::to_string(&DataValue::Null).unwrap(), "null");
    }

    #[test]
    fn test_data_value_from_json() {
        assert_eq!(DataValue::from(json!("x")), DataValue::String("x".to_string()));
        assert!(matches!(DataValue::from(json!(-3)), DataValue::I64(-3)));
        assert!(matches!(DataValue::from(json!(u64::MAX)), DataValue::U64(u64::MAX)));
        assert!(matches!(DataValue::from(json!(1.5)), DataValue::F64(_)));
        assert!(matches!(DataValue::from(json!([1, 2])), DataValue::Json(_)));
    }

    #[test]
    fn test_data_value_numeric_equality() {
        assert_eq!(DataValue::I64(7), DataValue::U64(7));
        assert_ne!(DataValue::I64(7), DataValue::String("7".to_string()));
    }

    #[test]
    fn test_data_value_from_struct() {
        #[derive(Serialize)]
        struct User {
            id: i64,
            name: String,
        }

        let value = DataValue::from_struct(User {
            id: 12345,
            name: "alice".to_string(),
        });

        let json = serde_json::to_value(&value).unwrap();
        assert_eq!(json["id"], 12345);
        assert_eq!(json["name"], "alice");
    }

    #[test]
    fn test_data_value_from_unencodable_struct() {
        // 非字符串 key 的 map 无法编码为 JSON 对象
        let mut map = std::collections::HashMap::new();
        map.insert((1, 2), "pair");

        let value = DataValue::from_struct(map);
        assert!(matches!(value, DataValue::Unencodable { .. }));
        assert!(serde_json::to_string(&value).is_err());
    }

    #[test]
    fn test_data_merge_last_writer_wins() {
        let mut data: Data = [("a", DataValue::from(1)), ("b", DataValue::from("x"))]
            .into_iter()
            .collect();
        data.merge([("b", DataValue::from("y")), ("c", DataValue::from(true))]);

        assert_eq!(data.len(), 3);
        assert_eq!(data.get("a"), Some(&DataValue::I64(1)));
        assert_eq!(data.get("b"), Some(&DataValue::from("y")));
        assert_eq!(data.get("c"), Some(&DataValue::Bool(true)));
    }

    #[test]
    fn test_data_merged_leaves_original() {
        let base: Data = [("a", DataValue::from(1))].into_iter().collect();
        let merged = base.merged([("a", DataValue::from(2))]);

        assert_eq!(base.get("a"), Some(&DataValue::I64(1)));
        assert_eq!(merged.get("a"), Some(&DataValue::I64(2)));
    }

    #[test]
    fn test_data_serialize_as_object() {
        let empty = Data::new();
        assert_eq!(serde_json::to_string(&empty).unwrap(), "{}");

        let mut data = Data::new();
        data.insert("user", "alice");
        data.insert("attempt", 3);
        let value = serde_json::to_value(&data).unwrap();
        assert_eq!(value, json!({"user": "alice", "attempt": 3}));

        let parsed: Data = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, data);
    }

    #[test]
    fn test_data_is_encodable() {
        let mut data = Data::new();
        data.insert("ok", 1);
        assert!(data.is_encodable());

        data.insert(
            "bad",
            DataValue::Unencodable {
                type_name: "T",
                reason: "nope".to_string(),
            },
        );
        assert!(!data.is_encodable());
    }
}
