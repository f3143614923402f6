/// Identification of a use case, shown in page titles and logs
pub trait UseCaseMetadata {
    /// Index such as "u501"
    fn usecase_index() -> &'static str;

    /// Technical name such as "nueva_venta"
    fn usecase_name() -> &'static str;

    /// Title shown in the UI
    fn display_name() -> &'static str;

    fn description() -> &'static str {
        ""
    }

    /// "u501_nueva_venta"
    fn full_name() -> String {
        format!("{}_{}", Self::usecase_index(), Self::usecase_name())
    }
}
