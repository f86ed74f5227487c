//! Distribution of wrapper implementations over output files.
//!
//! Classes keep their emission order. With `n` classes over `k` files every
//! file gets `n / k` classes and the first `n % k` files one more, so no two
//! files differ by more than one class.

/// Number of classes per file, in file order
pub fn partition_counts(total: usize, files: usize) -> Vec<usize> {
    if files == 0 {
        return Vec::new();
    }
    let base = total / files;
    let extra = total % files;
    (0..files)
        .map(|i| if i < extra { base + 1 } else { base })
        .collect()
}

/// Split `items` into `files` consecutive chunks sized by [`partition_counts`]
pub fn partition<T>(items: Vec<T>, files: usize) -> Vec<Vec<T>> {
    let counts = partition_counts(items.len(), files);
    let mut items = items.into_iter();
    counts
        .into_iter()
        .map(|count| items.by_ref().take(count).collect())
        .collect()
}

/// Name of the `index`-th (zero-based) of `count` implementation files.
///
/// # Examples
///
/// ```
/// use jbridge_codegen::partition::wrapper_file_name;
///
/// assert_eq!(wrapper_file_name(0, 1), "__wrap__.cpp");
/// assert_eq!(wrapper_file_name(0, 3), "__wrap01__.cpp");
/// assert_eq!(wrapper_file_name(2, 3), "__wrap03__.cpp");
/// ```
pub fn wrapper_file_name(index: usize, count: usize) -> String {
    if count <= 1 {
        "__wrap__.cpp".to_string()
    } else {
        format!("__wrap{:02}__.cpp", index + 1)
    }
}
