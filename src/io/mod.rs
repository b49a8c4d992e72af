//! Readers and writers for the candidate-line and template file formats.

mod candidate_lines_reader;
pub use candidate_lines_reader::CandidateLinesReader;

mod candidate_lines_writer;
pub use candidate_lines_writer::CandidateLinesWriter;

mod template_reader;
pub use template_reader::TemplateReader;
