use tracing::debug;

use crate::column::ColumnSet;
use crate::config::UserParameters;
use crate::model::ModelId;
use crate::store::ParameterStore;
use crate::widget::{ColumnWidget, TableTopology};

/// Settings of a table split into a fixed part and a scrolling part.
///
/// The fixed column count is chosen by the view, never derived from the
/// layout. The divider between the two panes is remembered per model as the
/// user parameter `TableDividerLocation_<model id>`.
#[derive(Debug, Clone)]
pub struct FixedColumnsLayout {
    model: ModelId,
    fixed_count: usize,
    fallback_divider: i64,
}

impl FixedColumnsLayout {
    pub fn new(model: ModelId, fixed_count: usize) -> Self {
        Self {
            model,
            fixed_count,
            fallback_divider: 60,
        }
    }

    /// Divider used when the fixed columns define no minimum width
    pub fn with_fallback_divider(mut self, divider: i64) -> Self {
        self.fallback_divider = divider;
        self
    }

    pub fn fixed_count(&self) -> usize {
        self.fixed_count
    }

    /// Pair the two panes of a split table
    pub fn topology<'a>(
        &self,
        fixed: &'a mut dyn ColumnWidget,
        scroll: &'a mut dyn ColumnWidget,
    ) -> TableTopology<'a> {
        TableTopology::Split {
            fixed,
            scroll,
            fixed_count: self.fixed_count,
        }
    }

    pub fn divider_key(&self) -> String {
        format!("TableDividerLocation_{}", self.model)
    }

    /// Sum of the minimum widths of the fixed columns, or the fallback
    pub fn default_divider(&self, columns: &mut ColumnSet) -> i64 {
        let width: i64 = columns
            .displayed_columns()
            .into_iter()
            .take(self.fixed_count)
            .map(|c| i64::from(c.min_width()))
            .sum();
        if width == 0 {
            self.fallback_divider
        } else {
            width
        }
    }

    pub fn divider_location(
        &self,
        columns: &mut ColumnSet,
        parameters: &mut UserParameters,
        store: &dyn ParameterStore,
    ) -> i64 {
        let default = self.default_divider(columns);
        parameters.get_int(&self.divider_key(), default, store)
    }

    /// Record a divider move; persisted with the next parameter store
    pub fn set_divider_location(&self, parameters: &mut UserParameters, location: i64) {
        debug!(target: "column_model", "Model {}: divider at {}", self.model, location);
        parameters.set_int(&self.divider_key(), location);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::ColumnDescriptor;
    use crate::store::MemoryLayoutStore;

    fn columns() -> ColumnSet {
        ColumnSet::from_schema(vec![
            ColumnDescriptor::new(1, "name", 120).with_min_width(90),
            ColumnDescriptor::new(2, "pos", 40).with_min_width(30),
            ColumnDescriptor::new(3, "age", 40).with_min_width(30),
        ])
        .unwrap()
    }

    #[test]
    fn test_default_divider_from_min_widths() {
        let layout = FixedColumnsLayout::new(ModelId(5), 2);
        assert_eq!(layout.default_divider(&mut columns()), 120);
        assert_eq!(layout.divider_key(), "TableDividerLocation_5");
    }

    #[test]
    fn test_fallback_divider() {
        let mut plain = ColumnSet::from_schema(vec![ColumnDescriptor::new(1, "name", 120)]).unwrap();
        let layout = FixedColumnsLayout::new(ModelId(5), 1).with_fallback_divider(80);
        assert_eq!(layout.default_divider(&mut plain), 80);
    }

    #[test]
    fn test_divider_round_trip() {
        let mut store = MemoryLayoutStore::new();
        let mut cols = columns();
        let layout = FixedColumnsLayout::new(ModelId(5), 1);

        let mut params = UserParameters::new();
        assert_eq!(layout.divider_location(&mut cols, &mut params, &store), 90);
        layout.set_divider_location(&mut params, 210);
        params.store_parameters(&mut store).unwrap();

        let mut fresh = UserParameters::new();
        assert_eq!(layout.divider_location(&mut cols, &mut fresh, &store), 210);
    }
}
