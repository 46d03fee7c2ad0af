use crossbeam_channel::Sender;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};

/// What the watcher reports about a program file
#[derive(Debug)]
pub enum WatchEvent {
    /// The file was written or recreated and should be run again
    Changed(PathBuf),
    Failed(notify::Error),
}

/// Watches program files and forwards only the changes worth a re-run.
///
/// notify delivers raw events on its own thread. Access and removal events
/// are dropped there; every modified or created path becomes one
/// [`WatchEvent::Changed`].
pub struct FileWatcher {
    watcher: RecommendedWatcher,
}

impl FileWatcher {
    pub fn new(tx: Sender<WatchEvent>) -> notify::Result<Self> {
        let watcher = notify::recommended_watcher(move |res| {
            for event in classify(res) {
                // Receiver gone means nobody is listening anymore
                if tx.send(event).is_err() {
                    break;
                }
            }
        })?;

        Ok(Self { watcher })
    }

    /// Start watching a single program file
    pub fn watch<P: AsRef<Path>>(&mut self, path: P) -> notify::Result<()> {
        self.watcher
            .watch(path.as_ref(), RecursiveMode::NonRecursive)
    }

    /// Stop watching a program file
    pub fn unwatch<P: AsRef<Path>>(&mut self, path: P) -> notify::Result<()> {
        self.watcher.unwatch(path.as_ref())
    }
}

/// Turn one raw notify result into the events a runner acts on
fn classify(res: notify::Result<Event>) -> Vec<WatchEvent> {
    match res {
        Ok(event) if matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) => {
            event.paths.into_iter().map(WatchEvent::Changed).collect()
        }
        Ok(_) => Vec::new(),
        Err(e) => vec![WatchEvent::Failed(e)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind, ModifyKind, RemoveKind};

    fn changed(res: notify::Result<Event>) -> Vec<PathBuf> {
        classify(res)
            .into_iter()
            .filter_map(|event| match event {
                WatchEvent::Changed(path) => Some(path),
                WatchEvent::Failed(_) => None,
            })
            .collect()
    }

    #[test]
    fn test_modify_and_create_are_forwarded() {
        let modify = Event::new(EventKind::Modify(ModifyKind::Any)).add_path("prog.swap".into());
        let create = Event::new(EventKind::Create(CreateKind::File))
            .add_path("a.swap".into())
            .add_path("b.swap".into());

        assert_eq!(changed(Ok(modify)), vec![PathBuf::from("prog.swap")]);
        assert_eq!(
            changed(Ok(create)),
            vec![PathBuf::from("a.swap"), PathBuf::from("b.swap")]
        );
    }

    #[test]
    fn test_access_and_remove_are_dropped() {
        let access = Event::new(EventKind::Access(AccessKind::Any)).add_path("prog.swap".into());
        let remove = Event::new(EventKind::Remove(RemoveKind::File)).add_path("prog.swap".into());

        assert!(classify(Ok(access)).is_empty());
        assert!(classify(Ok(remove)).is_empty());
    }

    #[test]
    fn test_errors_are_forwarded() {
        let events = classify(Err(notify::Error::generic("backend died")));

        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], WatchEvent::Failed(_)));
    }
}
