/// 构造 `Data`
///
/// # 示例
///
/// ```rust
/// use sessionlog::data;
///
/// let data = data! {
///     "user_id" => 12345,
///     "username" => "alice",
/// };
/// assert_eq!(data.len(), 2);
/// ```
#[macro_export]
macro_rules! data {
    () => {
        $crate::log::Data::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut data = $crate::log::Data::new();
        $(data.insert($key, $crate::log::DataValue::from($value));)+
        data
    }};
}
