use super::walker::InputFile;
use super::whole_file::{InputFormat, WorkUnit};

/// Cut enumerated files into work units. Files of a non-splittable format
/// always become exactly one unit.
pub fn plan_units(format: &dyn InputFormat, files: &[InputFile], split_size: u64) -> Vec<WorkUnit> {
    let mut units = Vec::with_capacity(files.len());
    for f in files {
        if split_size == 0 || f.len <= split_size || !format.is_splittable(&f.path) {
            units.push(WorkUnit::whole(f.path.clone(), f.len));
            continue;
        }
        let mut off = 0u64;
        while off < f.len {
            let len = split_size.min(f.len - off);
            units.push(WorkUnit {
                path: f.path.clone(),
                offset: off,
                len,
            });
            off += len;
        }
    }
    units
}

/// Spread units over at most `workers` disjoint partitions, balancing bytes.
/// Largest unit first onto the lightest partition; each partition is then
/// ordered by path.
pub fn partition(mut units: Vec<WorkUnit>, workers: usize) -> Vec<Vec<WorkUnit>> {
    if units.is_empty() {
        return Vec::new();
    }
    let n = workers.max(1).min(units.len());
    units.sort_by(|a, b| b.len.cmp(&a.len).then_with(|| a.path.cmp(&b.path)));

    let mut parts: Vec<Vec<WorkUnit>> = vec![Vec::new(); n];
    let mut load = vec![0u64; n];
    for u in units {
        let (i, _) = load
            .iter()
            .enumerate()
            .min_by_key(|(i, l)| (**l, *i))
            .unwrap_or((0, &0));
        load[i] += u.len;
        parts[i].push(u);
    }
    for p in &mut parts {
        p.sort_by(|a, b| a.path.cmp(&b.path).then(a.offset.cmp(&b.offset)));
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::record::ArchiveRecord;
    use crate::error::Result;
    use std::path::{Path, PathBuf};

    struct Splittable;

    impl InputFormat for Splittable {
        fn is_splittable(&self, _path: &Path) -> bool {
            true
        }
        fn read(&self, unit: &WorkUnit) -> Result<ArchiveRecord> {
            Ok(ArchiveRecord::plain(unit.path.display().to_string(), Vec::new()))
        }
    }

    struct Whole;

    impl InputFormat for Whole {
        fn is_splittable(&self, _path: &Path) -> bool {
            false
        }
        fn read(&self, unit: &WorkUnit) -> Result<ArchiveRecord> {
            Splittable.read(unit)
        }
    }

    fn files() -> Vec<InputFile> {
        vec![
            InputFile {
                path: PathBuf::from("big"),
                len: 250,
            },
            InputFile {
                path: PathBuf::from("small"),
                len: 10,
            },
        ]
    }

    #[test]
    fn non_splittable_files_stay_whole() {
        let units = plan_units(&Whole, &files(), 100);
        assert_eq!(
            units,
            vec![
                WorkUnit::whole(PathBuf::from("big"), 250),
                WorkUnit::whole(PathBuf::from("small"), 10)
            ]
        );
    }

    #[test]
    fn splittable_files_are_cut_at_split_size() {
        let units = plan_units(&Splittable, &files(), 100);
        let big: Vec<_> = units
            .iter()
            .filter(|u| u.path == Path::new("big"))
            .map(|u| (u.offset, u.len))
            .collect();
        assert_eq!(big, vec![(0, 100), (100, 100), (200, 50)]);
        assert_eq!(units.len(), 4);
    }

    #[test]
    fn partitions_are_disjoint_and_balanced() {
        let units: Vec<_> = [50u64, 40, 30, 20, 10, 10]
            .iter()
            .enumerate()
            .map(|(i, l)| WorkUnit::whole(PathBuf::from(format!("f{i}")), *l))
            .collect();
        let parts = partition(units.clone(), 2);
        assert_eq!(parts.len(), 2);
        let loads: Vec<u64> = parts.iter().map(|p| p.iter().map(|u| u.len).sum()).collect();
        assert_eq!(loads.iter().sum::<u64>(), 160);
        assert_eq!(loads, vec![80, 80]);

        let mut seen: Vec<_> = parts.into_iter().flatten().collect();
        seen.sort_by(|a, b| a.path.cmp(&b.path));
        assert_eq!(seen, units);
    }

    #[test]
    fn never_more_partitions_than_units() {
        let units = vec![WorkUnit::whole(PathBuf::from("one"), 1)];
        assert_eq!(partition(units, 8).len(), 1);
        assert!(partition(Vec::new(), 8).is_empty());
    }
}
