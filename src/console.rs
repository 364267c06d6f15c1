/// Status code a console returns for a completed selection.
pub const OK: i32 = 0;

/// Render capability every menu node needs.
///
/// The actual terminal/menu rendering engine lives outside this crate and is
/// injected at tree-build time. `menu` presents `items` as `(label,
/// description)` rows under a title and body text, and reports the status code
/// together with the label the user selected. Any status other than [`OK`]
/// means the selection must not be trusted.
pub trait Console {
    fn menu(
        &self,
        title: &str,
        body: &str,
        items: &[(String, String)],
        allow_cancel: bool,
    ) -> (i32, String);
}
