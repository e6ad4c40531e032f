use leftist_heap::leftist_heap::LeftistHeap;
use leftist_heap::util::Key;
use rand::Rng;

pub fn generate_numbers(size: usize) -> Vec<Key> {
    let mut rng = rand::thread_rng();
    (0..size).map(|_| rng.gen_range(-1000..1000)).collect()
}

pub fn sorted(numbers: &[Key]) -> Vec<Key> {
    let mut cloned = numbers.to_vec();
    cloned.sort();
    cloned
}

/// extract everything, checking the invariants after each step
pub fn drain(heap: &mut LeftistHeap) -> Vec<Key> {
    let mut keys = vec![];
    while !heap.is_empty() {
        keys.push(heap.extract_min().unwrap());
        heap.sanity_check().unwrap();
    }
    keys
}

/// insert one by one, checking the invariants after each step
pub fn build_checked(numbers: &[Key]) -> LeftistHeap {
    let mut heap = LeftistHeap::new();
    for &number in numbers {
        heap.insert(number);
        heap.sanity_check().unwrap();
        assert!(!heap.is_empty());
    }
    heap
}
