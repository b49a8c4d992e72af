/// A template: a stack of `order × order` bit layers pre-constraining a
/// search.
///
/// The bit at (layer, row, col) selects the symbol-range partition a grid
/// cell belongs to; per-cell sums across layers ("weights") drive the
/// weight-bucket cardinalities of line generation.
#[derive(Debug)]
pub struct Template {
    order: usize,
    layers: Vec<Vec<Vec<u8>>>,
}

impl Template {
    /// Builds an empty template over grids of the given order.
    pub fn new(order: usize) -> Self {
        assert!(order > 0, "a template must have a positive order");
        Self {
            order,
            layers: Vec::new(),
        }
    }

    /// Appends a layer to the template.
    ///
    /// # Panics
    ///
    /// Panics if the layer is not an `order × order` bit grid; readers must
    /// validate their input before building the template.
    pub fn push_layer(&mut self, layer: Vec<Vec<u8>>) {
        assert!(
            layer.len() == self.order && layer.iter().all(|row| row.len() == self.order),
            "a template layer must be a {0} x {0} grid",
            self.order
        );
        assert!(
            layer.iter().flatten().all(|b| *b <= 1),
            "template layers hold bits"
        );
        self.layers.push(layer);
    }

    /// Returns the grid order.
    pub fn order(&self) -> usize {
        self.order
    }

    /// Returns the number of layers.
    pub fn n_layers(&self) -> usize {
        self.layers.len()
    }

    /// Returns the bit at the given position.
    ///
    /// # Panics
    ///
    /// Panics if any coordinate is out of range; such an access is an
    /// encoding bug, never a data issue.
    pub fn bit(&self, layer: usize, row: usize, col: usize) -> u8 {
        assert!(
            layer < self.layers.len() && row < self.order && col < self.order,
            "template bit ({}, {}, {}) is out of range for {} layers of order {}",
            layer,
            row,
            col,
            self.layers.len(),
            self.order
        );
        self.layers[layer][row][col]
    }

    /// Returns the weight of a cell: the sum of its bits across all layers.
    pub fn weight(&self, row: usize, col: usize) -> usize {
        (0..self.layers.len())
            .map(|l| self.bit(l, row, col) as usize)
            .sum()
    }
}
