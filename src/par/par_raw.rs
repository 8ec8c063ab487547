use std::thread;

use crate::MAX_THREADS;

#[inline(always)]
pub fn par_map<T, F>(data: &mut [T], func: &F, chunks: usize)
where
    T: Send + Sync,
    F: Fn(usize, &mut T) + Send + Sync,
{
    if !data.is_empty() {
        // Limit the max number of chunks in this case since they are actual threads
        let chunk_count = chunks.max(1).min(MAX_THREADS).min(data.len());
        let chunk_size = data.len().div_ceil(chunk_count);
        if chunk_count == 1 {
            for (i, output) in data.iter_mut().enumerate() {
                func(i, output);
            }
        } else {
            thread::scope(|s| {
                let mut slice = data;
                for chunk_id in 0..chunk_count {
                    let slice_len = slice.len();
                    let (left, right) = slice.split_at_mut(chunk_size.min(slice_len));
                    slice = right;
                    let start = chunk_id * chunk_size;
                    if chunk_id == chunk_count - 1 {
                        // Run the last one on this thread
                        for (i, output) in left.iter_mut().enumerate() {
                            func(start + i, output);
                        }
                    } else {
                        s.spawn(move || {
                            for (i, output) in left.iter_mut().enumerate() {
                                func(start + i, output);
                            }
                        });
                    }
                }
            });
        }
    }
}
