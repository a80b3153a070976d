/*!
Shared type-level plumbing: the error taxonomy used throughout the library.
*/

pub mod err;
