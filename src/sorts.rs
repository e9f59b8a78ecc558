use std::fmt;

/// The four algorithms in the column order of the measurements file (`Y1`..`Y4`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    StdSort,
    Bubble,
    Selection,
    Heap,
}

impl Algorithm {
    pub const ALL: [Algorithm; 4] = [
        Algorithm::StdSort,
        Algorithm::Bubble,
        Algorithm::Selection,
        Algorithm::Heap,
    ];

    /// Slug used in output file names.
    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::StdSort => "std_sort",
            Algorithm::Bubble => "bubble_sort",
            Algorithm::Selection => "selection_sort",
            Algorithm::Heap => "heap_sort",
        }
    }

    /// Legend label on the chart.
    pub fn label(&self) -> &'static str {
        match self {
            Algorithm::StdSort => "std::sort()",
            Algorithm::Bubble => "Bubble sort",
            Algorithm::Selection => "Selection sort",
            Algorithm::Heap => "Heap sort",
        }
    }

    pub fn sort<T: Ord>(&self, arr: &mut [T]) {
        match self {
            Algorithm::StdSort => std_sort(arr),
            Algorithm::Bubble => bubble_sort(arr),
            Algorithm::Selection => selection_sort(arr),
            Algorithm::Heap => heap_sort(arr),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub fn std_sort<T: Ord>(arr: &mut [T]) {
    arr.sort();
}

pub fn bubble_sort<T: Ord>(arr: &mut [T]) {
    let n = arr.len();
    for i in 0..n.saturating_sub(1) {
        for j in 0..n - i - 1 {
            if arr[j] > arr[j + 1] {
                arr.swap(j, j + 1);
            }
        }
    }
}

pub fn selection_sort<T: Ord>(arr: &mut [T]) {
    let n = arr.len();
    for i in 0..n.saturating_sub(1) {
        let mut min_idx = i;
        for j in i + 1..n {
            if arr[j] < arr[min_idx] {
                min_idx = j;
            }
        }
        if min_idx != i {
            arr.swap(i, min_idx);
        }
    }
}

pub fn heap_sort<T: Ord>(arr: &mut [T]) {
    let n = arr.len();
    for i in (0..n / 2).rev() {
        sift_down(arr, n, i);
    }
    for end in (1..n).rev() {
        arr.swap(0, end);
        sift_down(arr, end, 0);
    }
}

// Restores the max-heap property for the subtree rooted at `root` within `arr[..len]`.
fn sift_down<T: Ord>(arr: &mut [T], len: usize, mut root: usize) {
    loop {
        let left = 2 * root + 1;
        let right = left + 1;
        let mut largest = root;

        if left < len && arr[left] > arr[largest] {
            largest = left;
        }
        if right < len && arr[right] > arr[largest] {
            largest = right;
        }
        if largest == root {
            return;
        }
        arr.swap(root, largest);
        root = largest;
    }
}

#[cfg(test)]
fn check_against_std(algorithm: Algorithm) {
    let inputs: Vec<Vec<i32>> = vec![
        vec![],
        vec![42],
        vec![2, 1],
        vec![5, 3, 8, 1, 9, 2, 7],
        vec![1, 2, 3, 4, 5],
        vec![5, 4, 3, 2, 1],
        vec![3, 3, 1, 2, 3, 1, 0, -4, 3],
    ];
    for input in inputs {
        let mut expected = input.clone();
        expected.sort();
        let mut actual = input.clone();
        algorithm.sort(&mut actual);
        assert_eq!(actual, expected, "{} on {:?}", algorithm, input);
    }
}

#[test]
fn bubble_sorts() {
    check_against_std(Algorithm::Bubble);
}

#[test]
fn selection_sorts() {
    check_against_std(Algorithm::Selection);
}

#[test]
fn heap_sorts() {
    check_against_std(Algorithm::Heap);
}

#[test]
fn heap_sorts_larger_input() {
    let mut arr: Vec<u32> = (0..1000).map(|i| (i * 7919) % 1009).collect();
    let mut expected = arr.clone();
    expected.sort();
    heap_sort(&mut arr);
    assert_eq!(arr, expected);
}

#[test]
fn algorithms_in_column_order() {
    let labels: Vec<&str> = Algorithm::ALL.iter().map(|a| a.label()).collect();
    assert_eq!(
        labels,
        vec!["std::sort()", "Bubble sort", "Selection sort", "Heap sort"]
    );
}
