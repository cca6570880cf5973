#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct RowsCount(pub usize);
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct ColumnsCount(pub usize);

/// Side length in pixels of the square block one physical grid position becomes in a raster image.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct UpscaleFactor(pub u32);

impl Default for UpscaleFactor {
    fn default() -> Self {
        UpscaleFactor(3)
    }
}
