use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::error::Result;
use crate::layout::{FinalizedTree, HEADER_SIZE};

pub(crate) fn dump(buf: &[u8], path: &Path) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(buf)?;
    Ok(())
}

impl FinalizedTree {
    /// Reads the file in page-sized chunks, hinting to the OS to drop
    /// each page from the cache afterward.
    pub fn load(path: &Path) -> Result<FinalizedTree> {
        let mut file = File::open(path)?;
        let len = file.metadata()?.len() as usize;

        let mut buf = vec![0u8; len];
        read_with_residency_hint(&mut file, &mut buf)?;

        debug_assert!(len >= HEADER_SIZE, "file too small to hold a quadtree header");

        Ok(FinalizedTree::from_buf(buf.into_boxed_slice()))
    }
}

#[cfg(unix)]
fn read_with_residency_hint(file: &mut File, buf: &mut [u8]) -> Result<()> {
    use std::os::unix::io::AsRawFd;

    let page_size = page_size();
    let fd = file.as_raw_fd();
    let mut offset = 0usize;

    while offset < buf.len() {
        let chunk_len = page_size.min(buf.len() - offset);
        file.read_exact(&mut buf[offset..offset + chunk_len])?;

        // SAFETY: `fd` is valid for the lifetime of this call, and the
        // range given was just read into our own buffer, not mapped
        // memory. This only advises the kernel's page cache.
        unsafe {
            libc::posix_fadvise(
                fd,
                offset as libc::off_t,
                chunk_len as libc::off_t,
                libc::POSIX_FADV_DONTNEED,
            );
        }

        offset += chunk_len;
    }

    Ok(())
}

#[cfg(not(unix))]
fn read_with_residency_hint(file: &mut File, buf: &mut [u8]) -> Result<()> {
    file.read_exact(buf)?;
    Ok(())
}

#[cfg(unix)]
fn page_size() -> usize {
    // SAFETY: sysconf with _SC_PAGESIZE never fails in practice and
    // takes no pointer arguments.
    let size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    if size > 0 {
        size as usize
    } else {
        4096
    }
}
