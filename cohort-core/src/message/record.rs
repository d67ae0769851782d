/*
 * Copyright (c) 2025. Cohort Contributors
 *
 * Licensed under either of
 *   * Apache License, Version 2.0 (the "License");
 *     you may not use this file except in compliance with the License.
 *     You may obtain a copy of the License at http://www.apache.org/licenses/LICENSE-2.0
 *   * MIT license: http://opensource.org/licenses/MIT
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the applicable License for the specific language governing permissions and
 * limitations under that License.
 */

/// One unit of bulk data handed between a data source and a data sink.
///
/// A zero-length record is the reserved end-of-data sentinel; it is never a
/// valid payload for real data. The record owns its buffer, so releasing a
/// record is simply dropping it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataRecord {
    bytes: Vec<u8>,
}

impl DataRecord {
    /// Wraps a byte buffer as a record. An empty buffer is the end-of-data
    /// sentinel.
    #[must_use]
    pub fn new(bytes: Vec<u8>) -> Self {
        DataRecord { bytes }
    }

    /// The end-of-data sentinel.
    #[must_use]
    pub fn end_of_data() -> Self {
        DataRecord::default()
    }

    /// Whether this record is the end-of-data sentinel.
    #[must_use]
    pub fn is_end_of_data(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Payload size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the payload is empty. Equivalent to [`is_end_of_data`].
    ///
    /// [`is_end_of_data`]: DataRecord::is_end_of_data
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Borrows the payload.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consumes the record, returning the owned payload.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl From<Vec<u8>> for DataRecord {
    fn from(bytes: Vec<u8>) -> Self {
        DataRecord::new(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_record_is_the_sentinel() {
        assert!(DataRecord::end_of_data().is_end_of_data());
        assert!(DataRecord::new(Vec::new()).is_end_of_data());
        assert!(!DataRecord::new(b"payload".to_vec()).is_end_of_data());
    }

    #[test]
    fn record_owns_its_buffer() {
        let record = DataRecord::new(b"abc".to_vec());
        assert_eq!(record.len(), 3);
        assert_eq!(record.as_bytes(), b"abc");
        assert_eq!(record.into_bytes(), b"abc".to_vec());
    }
}
