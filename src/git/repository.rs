use crate::error::{Result, SemverError};
use crate::git::{CommitInfo, TagRef};
use crate::signing::TagSigner;
use git2::{Oid, Repository as Git2Repo, Signature};
use std::path::Path;
use tracing::{debug, warn};

/// Identity used for tags when the repository has no `user.name`/`user.email`
pub const FALLBACK_TAGGER_NAME: &str = "git-semver";
pub const FALLBACK_TAGGER_EMAIL: &str = "git-semver@localhost";

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
    access_token: Option<String>,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository {
            repo,
            access_token: None,
        })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository {
            repo,
            access_token: None,
        }
    }

    /// Use a token for HTTPS remotes when pushing
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Underlying git2 handle
    pub fn inner(&self) -> &Git2Repo {
        &self.repo
    }

    fn tagger(&self) -> Result<Signature<'static>> {
        match self.repo.signature() {
            Ok(sig) => Ok(sig.to_owned()),
            Err(_) => Ok(Signature::now(FALLBACK_TAGGER_NAME, FALLBACK_TAGGER_EMAIL)?),
        }
    }

    fn write_signed_tag(
        &self,
        name: &str,
        target: Oid,
        message: &str,
        signer: &dyn TagSigner,
    ) -> Result<Oid> {
        let tagger = self.tagger()?;
        let content = tag_object_content(name, target, &tagger, message);
        let signature = signer.sign(content.as_bytes())?;

        let mut signed = content;
        signed.push_str(&signature);
        if !signed.ends_with('\n') {
            signed.push('\n');
        }

        let tag_oid = self.repo.odb()?.write(git2::ObjectType::Tag, signed.as_bytes())?;
        self.repo
            .reference(
                &format!("refs/tags/{}", name),
                tag_oid,
                false,
                &format!("tag: {}", name),
            )
            .map_err(|e| SemverError::tag(format!("Cannot create tag '{}': {}", name, e)))?;

        Ok(tag_oid)
    }

    fn remote_callbacks(&self) -> git2::RemoteCallbacks<'_> {
        let mut callbacks = git2::RemoteCallbacks::new();
        let token = self.access_token.clone();

        callbacks.credentials(move |_url, username_from_url, allowed_types| {
            if allowed_types.contains(git2::CredentialType::USER_PASS_PLAINTEXT) {
                if let Some(token) = &token {
                    return git2::Cred::userpass_plaintext("x-access-token", token);
                }
            }

            if allowed_types.contains(git2::CredentialType::SSH_KEY) {
                let username = username_from_url.unwrap_or("git");
                if let Some(home) = dirs::home_dir() {
                    for key in ["id_ed25519", "id_rsa", "id_ecdsa"] {
                        let path = home.join(".ssh").join(key);
                        if path.exists() {
                            if let Ok(cred) = git2::Cred::ssh_key(username, None, &path, None) {
                                return Ok(cred);
                            }
                        }
                    }
                }

                if let Ok(cred) = git2::Cred::ssh_key_from_agent(username) {
                    return Ok(cred);
                }
            }

            git2::Cred::default()
        });

        callbacks.push_update_reference(|refname, status| match status {
            Some(status) => {
                warn!(reference = refname, status, "remote rejected reference");
                Err(git2::Error::from_str(&format!(
                    "Push failed for {}: {}",
                    refname, status
                )))
            }
            None => Ok(()),
        });

        callbacks
    }
}

/// Raw tag object text, ready to be signed
fn tag_object_content(name: &str, target: Oid, tagger: &Signature<'_>, message: &str) -> String {
    let when = tagger.when();
    let offset = when.offset_minutes();
    let sign = if offset < 0 { '-' } else { '+' };

    let mut content = format!(
        "object {}\ntype commit\ntag {}\ntagger {} <{}> {} {}{:02}{:02}\n\n{}",
        target,
        name,
        tagger.name().unwrap_or(FALLBACK_TAGGER_NAME),
        tagger.email().unwrap_or(FALLBACK_TAGGER_EMAIL),
        when.seconds(),
        sign,
        offset.abs() / 60,
        offset.abs() % 60,
        message,
    );
    if !content.ends_with('\n') {
        content.push('\n');
    }
    content
}

impl super::Repository for Git2Repository {
    fn resolve(&self, reference: &str) -> Result<Oid> {
        let object = self
            .repo
            .revparse_single(reference)
            .map_err(|e| SemverError::UnresolvedReference(format!("{}: {}", reference, e.message())))?;

        let commit = object.peel_to_commit().map_err(|e| {
            SemverError::UnresolvedReference(format!("{}: {}", reference, e.message()))
        })?;

        Ok(commit.id())
    }

    fn find_commit(&self, oid: Oid) -> Result<CommitInfo> {
        let commit = self.repo.find_commit(oid)?;

        Ok(CommitInfo {
            id: oid,
            message: String::from_utf8_lossy(commit.message_bytes()).into_owned(),
            parents: commit.parent_ids().collect(),
            time: commit.time().seconds(),
        })
    }

    fn merge_base(&self, a: Oid, b: Oid) -> Result<Vec<Oid>> {
        match self.repo.merge_bases(a, b) {
            Ok(bases) => Ok(bases.iter().copied().collect()),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn list_tags(&self) -> Result<Vec<TagRef>> {
        let names = self.repo.tag_names(None)?;
        let mut tags = Vec::new();

        for name in names.iter().flatten() {
            let reference = self.repo.find_reference(&format!("refs/tags/{}", name))?;

            let commit = match reference.peel_to_commit() {
                Ok(commit) => commit,
                Err(_) => {
                    debug!(tag = name, "skipping tag that does not point at a commit");
                    continue;
                }
            };

            let tagger_time = reference
                .target()
                .and_then(|oid| self.repo.find_tag(oid).ok())
                .and_then(|tag| tag.tagger().map(|sig| sig.when().seconds()));

            tags.push(TagRef {
                name: name.to_string(),
                target: commit.id(),
                created: tagger_time.unwrap_or_else(|| commit.time().seconds()),
            });
        }

        Ok(tags)
    }

    fn is_ancestor(&self, ancestor: Oid, descendant: Oid) -> Result<bool> {
        if ancestor == descendant {
            return Ok(true);
        }
        Ok(self.repo.graph_descendant_of(descendant, ancestor)?)
    }

    fn create_tag(
        &self,
        name: &str,
        target: Oid,
        message: &str,
        signer: Option<&dyn TagSigner>,
    ) -> Result<Oid> {
        let refname = format!("refs/tags/{}", name);
        if !git2::Reference::is_valid_name(&refname) {
            return Err(SemverError::tag(format!("Invalid tag name '{}'", name)));
        }
        if self.repo.find_reference(&refname).is_ok() {
            return Err(SemverError::tag(format!("Tag '{}' already exists", name)));
        }

        if let Some(signer) = signer {
            return self.write_signed_tag(name, target, message, signer);
        }

        let object = self
            .repo
            .find_object(target, None)
            .map_err(|e| SemverError::tag(format!("Cannot find object: {}", e)))?;
        let tagger = self.tagger()?;

        self.repo
            .tag(name, &object, &tagger, message, false)
            .map_err(|e| SemverError::tag(format!("Cannot create tag '{}': {}", name, e)))
    }

    fn push_tags(&self, remote: &str, tag_names: &[&str]) -> Result<()> {
        let mut remote = self
            .repo
            .find_remote(remote)
            .map_err(|e| SemverError::remote(format!("Cannot find remote '{}': {}", remote, e)))?;

        let refspecs: Vec<String> = tag_names
            .iter()
            .map(|tag| format!("refs/tags/{}:refs/tags/{}", tag, tag))
            .collect();

        let refspec_strs: Vec<&str> = refspecs.iter().map(|s| s.as_str()).collect();

        let mut push_options = git2::PushOptions::new();
        push_options.remote_callbacks(self.remote_callbacks());

        remote.push(&refspec_strs, Some(&mut push_options)).map_err(|e| {
            if e.class() == git2::ErrorClass::Net {
                SemverError::remote(format!("Network error during push: {}", e))
            } else {
                SemverError::remote(format!("Push failed: {}", e))
            }
        })?;

        Ok(())
    }
}
