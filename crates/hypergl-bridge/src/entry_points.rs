//! The closed set of entry points a guest may import.
//!
//! Guests import each one as `hypergl_<name>` from the bridge import module.

/// Prefix on every import name.
pub const IMPORT_PREFIX: &str = "hypergl_";

/// GL names of every supported entry point.
pub const ENTRY_POINTS: &[&str] = &[
    // state
    "glCullFace",
    "glClear",
    "glDepthMask",
    "glDisable",
    "glEnable",
    "glFlush",
    "glDepthFunc",
    "glReadBuffer",
    "glViewport",
    "glActiveTexture",
    "glBlendFuncSeparate",
    "glBlendEquationSeparate",
    "glDrawBuffers",
    "glStencilOpSeparate",
    "glStencilFuncSeparate",
    "glStencilMaskSeparate",
    "glPixelStorei",
    "glClearBufferiv",
    "glClearBufferuiv",
    "glClearBufferfv",
    "glClearBufferfi",
    // queries
    "glGetError",
    "glGetIntegerv",
    "glGetString",
    // textures
    "glGenTextures",
    "glDeleteTextures",
    "glBindTexture",
    "glTexParameteri",
    "glTexImage2D",
    "glTexSubImage2D",
    "glTexImage3D",
    "glTexSubImage3D",
    "glGenerateMipmap",
    "glReadPixels",
    // buffers
    "glGenBuffers",
    "glDeleteBuffers",
    "glBindBuffer",
    "glBindBufferBase",
    "glBindBufferRange",
    "glBufferData",
    "glBufferSubData",
    "glGetBufferSubData",
    "glCopyBufferSubData",
    "glBufferStorage",
    "glMapBufferRange",
    "glUnmapBuffer",
    // shaders and programs
    "glCreateShader",
    "glDeleteShader",
    "glShaderSource",
    "glCompileShader",
    "glGetShaderiv",
    "glGetShaderInfoLog",
    "glCreateProgram",
    "glDeleteProgram",
    "glAttachShader",
    "glDetachShader",
    "glLinkProgram",
    "glUseProgram",
    "glGetProgramiv",
    "glGetProgramInfoLog",
    "glGetActiveAttrib",
    "glGetActiveUniform",
    "glGetAttribLocation",
    "glGetUniformLocation",
    "glGetUniformBlockIndex",
    "glGetActiveUniformBlockiv",
    "glGetActiveUniformBlockName",
    "glUniformBlockBinding",
    // uniforms
    "glUniform1i",
    "glUniform1fv",
    "glUniform2fv",
    "glUniform3fv",
    "glUniform4fv",
    "glUniform1iv",
    "glUniform2iv",
    "glUniform3iv",
    "glUniform4iv",
    "glUniform1uiv",
    "glUniform2uiv",
    "glUniform3uiv",
    "glUniform4uiv",
    "glUniformMatrix2fv",
    "glUniformMatrix3fv",
    "glUniformMatrix4fv",
    "glUniformMatrix2x3fv",
    "glUniformMatrix3x2fv",
    "glUniformMatrix2x4fv",
    "glUniformMatrix4x2fv",
    "glUniformMatrix3x4fv",
    "glUniformMatrix4x3fv",
    // vertex input and draws
    "glGenVertexArrays",
    "glDeleteVertexArrays",
    "glBindVertexArray",
    "glEnableVertexAttribArray",
    "glVertexAttribPointer",
    "glVertexAttribIPointer",
    "glVertexAttribDivisor",
    "glDrawArraysInstanced",
    "glDrawElementsInstanced",
    // framebuffers and renderbuffers
    "glGenFramebuffers",
    "glDeleteFramebuffers",
    "glBindFramebuffer",
    "glFramebufferTexture2D",
    "glFramebufferRenderbuffer",
    "glFramebufferTextureLayer",
    "glBlitFramebuffer",
    "glGenRenderbuffers",
    "glDeleteRenderbuffers",
    "glBindRenderbuffer",
    "glRenderbufferStorageMultisample",
    // samplers
    "glGenSamplers",
    "glDeleteSamplers",
    "glBindSampler",
    "glSamplerParameteri",
    "glSamplerParameterf",
    // compute placeholders
    "glDispatchCompute",
    "glMemoryBarrier",
    "glBindImageTexture",
];

/// Guest import name for a GL entry point.
pub fn import_name(gl_name: &str) -> String {
    format!("{IMPORT_PREFIX}{gl_name}")
}

/// GL name behind an import name, if it is one the bridge provides.
pub fn lookup_import(import: &str) -> Option<&'static str> {
    let gl_name = import.strip_prefix(IMPORT_PREFIX)?;
    ENTRY_POINTS.iter().copied().find(|&name| name == gl_name)
}
