// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("column {column} is the last visible column")]
    LastVisibleColumn { column: usize },
    #[error("column {column} is already hidden")]
    AlreadyHidden { column: usize },
    #[error("column {column} out of range for {count} columns")]
    ColumnOutOfRange { column: usize, count: usize },
}
