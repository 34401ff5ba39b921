//! The producer loop: read chunks, frame, decode, normalize, publish.
//!
//! Everything here runs on one thread. The only blocking point is
//! [`ChunkSource::read_chunk`]; all per-frame work is synchronous.

use crate::metrics::{normalize, MetricCatalog, MetricSink};
use crate::stream::{decode, StreamFramer};
use crate::utils::error::PipelineError;
use log::{debug, info};
use std::io::{ErrorKind, Read};

/// A stream that hands out chunks until it ends
///
/// Implemented for every [`Read`], so a child's stdout, a file or a byte
/// slice can all drive the pipeline.
pub trait ChunkSource {
    /// Fill `buf` with the next chunk; `Ok(0)` means end of stream
    fn read_chunk(&mut self, buf: &mut [u8]) -> std::io::Result<usize>;
}

impl<R: Read + ?Sized> ChunkSource for R {
    fn read_chunk(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.read(buf)
    }
}

/// Counters for one pipeline run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    /// Chunks read from the source
    pub chunks: u64,

    /// Frames cut out by the framer
    pub frames: u64,

    /// Frames dropped because they were not valid JSON
    pub decode_failures: u64,

    /// Records published to the sink
    pub records: u64,
}

/// Framer plus the catalog and sink each frame is published to
pub struct Pipeline<'a, S: ?Sized> {
    framer: StreamFramer,
    catalog: &'a MetricCatalog,
    sink: &'a S,
    stats: PipelineStats,
}

impl<'a, S: MetricSink + ?Sized> Pipeline<'a, S> {
    pub fn new(framer: StreamFramer, catalog: &'a MetricCatalog, sink: &'a S) -> Self {
        Self {
            framer,
            catalog,
            sink,
            stats: PipelineStats::default(),
        }
    }

    /// Drive the pipeline until `source` ends
    ///
    /// **Public** - main entry point of the producer thread
    ///
    /// # Arguments
    /// * `source` - Raw monitor output
    /// * `chunk_size` - Maximum bytes per read (at least 1 is used)
    ///
    /// # Returns
    /// Counters for the whole run, once the source reports end of stream
    ///
    /// # Errors
    /// * `PipelineError::Read` - the source failed; interrupted reads are retried
    pub fn run<C: ChunkSource + ?Sized>(
        &mut self,
        source: &mut C,
        chunk_size: usize,
    ) -> Result<PipelineStats, PipelineError> {
        let mut buf = vec![0u8; chunk_size.max(1)];

        loop {
            let read = match source.read_chunk(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(PipelineError::Read(e)),
            };
            self.feed(&buf[..read]);
        }

        if self.framer.buffered_len() > 0 {
            debug!(
                "Stream ended inside a frame, dropping {} buffered bytes",
                self.framer.buffered_len()
            );
        }

        info!(
            "Stream ended: {} frames, {} published, {} undecodable",
            self.stats.frames, self.stats.records, self.stats.decode_failures
        );

        Ok(self.stats)
    }

    /// Process one chunk: publish every frame it completes
    pub fn feed(&mut self, chunk: &[u8]) {
        self.stats.chunks += 1;

        for frame in self.framer.feed(chunk) {
            self.process_frame(&frame);
        }
    }

    /// Decode, normalize and publish one frame
    ///
    /// Returns `false` when the frame was dropped. A dropped frame leaves
    /// the sink untouched.
    pub fn process_frame(&mut self, frame: &str) -> bool {
        self.stats.frames += 1;

        let record = match decode(frame) {
            Ok(record) => record,
            Err(e) => {
                debug!("Dropping undecodable frame ({} bytes): {}", frame.len(), e);
                self.stats.decode_failures += 1;
                return false;
            }
        };

        debug!("{}", record);

        for (name, value) in normalize(&record, self.catalog) {
            self.sink.set(name, value);
        }

        self.stats.records += 1;
        true
    }

    pub fn stats(&self) -> PipelineStats {
        self.stats
    }

    pub fn framer(&self) -> &StreamFramer {
        &self.framer
    }
}
